//! FindFace command-line client.
//!
//! Usage:
//!   findface detect <photo>
//!   findface verify <photo1> <photo2> [threshold]
//!   findface identify <photo> [gallery] [n]
//!
//! `<photo>` is a local file path or an http(s) URL. The access token is read
//! from `FINDFACE_ACCESS_TOKEN` (a `.env` file is honored).

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use findface_client::{FindfaceClient, Photo, RequestOptions};

const USAGE: &str = "usage: findface detect <photo>
       findface verify <photo1> <photo2> [threshold]
       findface identify <photo> [gallery] [n]";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = FindfaceClient::from_env();

    let output = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["detect", photo] => {
            let boxes = client.detect(load_photo(photo).await?).await?;
            info!(faces = boxes.len(), "Detection finished");
            serde_json::to_value(boxes)?
        }
        ["verify", photo1, photo2, rest @ ..] => {
            let mut options = RequestOptions::new();
            if let [threshold] = rest {
                options = options.threshold(
                    threshold
                        .parse()
                        .with_context(|| format!("invalid threshold '{}'", threshold))?,
                );
            }
            client
                .verify(load_photo(photo1).await?, load_photo(photo2).await?, &options)
                .await?
        }
        ["identify", photo, rest @ ..] => {
            let mut options = RequestOptions::new();
            if let Some(gallery) = rest.first() {
                options = options.gallery(*gallery);
            }
            if let Some(n) = rest.get(1) {
                options = options.n(n.parse().with_context(|| format!("invalid n '{}'", n))?);
            }
            client.identify(load_photo(photo).await?, &options).await?
        }
        _ => bail!(USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Colored output for dev, JSON when `LOG_FORMAT=json`.
fn init_tracing() -> Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("findface=info,findface_client=info"))?;

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

async fn load_photo(arg: &str) -> Result<Photo> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        return Ok(Photo::from_url(arg));
    }

    let path = Path::new(arg);
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read photo {}", path.display()))?;

    let mut photo = Photo::from_bytes(data);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        photo = photo.with_file_name(name);
    }
    if let Some(mime) = mime_for(path) {
        photo = photo.with_mime_type(mime);
    }
    Ok(photo)
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

//! Client for the FindFace face recognition API.
//!
//! This crate provides:
//! - Face detection, verification and gallery identification calls
//! - Lazily created, token-authenticated connection shared across calls
//! - Multipart uploads for raw photo bytes, JSON for everything else
//! - Error classification for responses that embed a service error `code`
//! - A pluggable HTTP executor and request logger
//!
//! ```no_run
//! use findface_client::{FindfaceClient, FindfaceConfig, Photo, RequestOptions};
//!
//! # async fn run() -> findface_client::FindfaceResult<()> {
//! let client = FindfaceClient::new(FindfaceConfig::with_token("my-token"));
//! let faces = client
//!     .detect(Photo::from_url("https://static.findface.pro/sample.jpg"))
//!     .await?;
//! let matches = client
//!     .identify(
//!         Photo::from_bytes(std::fs::read("face.jpg").unwrap_or_default()),
//!         &RequestOptions::new().gallery("staff").n(5),
//!     )
//!     .await?;
//! # let _ = (faces, matches);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod logger;
pub mod mapper;
pub mod metrics;
pub mod request;
pub mod transport;
pub mod validator;

pub use client::FindfaceClient;
pub use config::{FindfaceConfig, API_VERSION, ENDPOINT_URI};
pub use connection::Connection;
pub use error::{FindfaceError, FindfaceResult};
pub use findface_models::{BoundingBox, Face};
pub use logger::{RequestLogger, TracingLogger};
pub use request::{build_body, build_path, Field, Payload, Photo, RequestOptions};
pub use transport::{HttpExecutor, HttpRequest, HttpResponse, ReqwestExecutor, RequestBody};

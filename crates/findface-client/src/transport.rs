//! Pluggable HTTP boundary.
//!
//! The client never touches sockets itself: it hands an [`HttpRequest`] to an
//! [`HttpExecutor`] and gets back the status and decoded body. The default
//! executor is built on reqwest; tests and embedders can swap in their own.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Proxy};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::FindfaceConfig;
use crate::error::{FindfaceError, FindfaceResult};
use crate::request::{Field, Payload, Photo};

// =============================================================================
// Request Body
// =============================================================================

/// Encoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// `multipart/form-data`; photo bytes become file parts, everything else text parts.
    Multipart(Payload),
}

impl RequestBody {
    /// Pick the encoding for a payload: multipart as soon as one field carries
    /// raw photo bytes, JSON otherwise.
    pub fn encode(payload: Payload) -> Self {
        let binary = payload
            .values()
            .any(|field| matches!(field, Field::Photo(photo) if photo.is_binary()));

        if binary {
            return RequestBody::Multipart(payload);
        }

        let object = payload
            .into_iter()
            .map(|(key, field)| {
                let value = match field {
                    Field::Value(v) => v,
                    Field::Photo(Photo::Url(url)) => Value::String(url),
                    // Unreachable: binary payloads took the multipart branch.
                    Field::Photo(Photo::Bytes { .. }) => Value::Null,
                };
                (key, value)
            })
            .collect();
        RequestBody::Json(Value::Object(object))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }

    /// Loggable rendering; binary parts are summarized by size.
    pub fn describe(&self) -> String {
        match self {
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Multipart(payload) => {
                let parts: Vec<String> = payload
                    .iter()
                    .map(|(key, field)| match field {
                        Field::Photo(Photo::Bytes { data, .. }) => {
                            format!("{}=<{} bytes>", key, data.len())
                        }
                        Field::Photo(Photo::Url(url)) => format!("{}={}", key, url),
                        Field::Value(v) => format!("{}={}", key, text_value(v)),
                    })
                    .collect();
                format!("multipart[{}]", parts.join(", "))
            }
        }
    }
}

// =============================================================================
// Requests and Responses
// =============================================================================

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: reqwest::Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Copy of method, URL and headers with an empty body.
    pub(crate) fn clone_head(&self) -> HttpRequest {
        HttpRequest {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: RequestBody::Json(Value::Null),
        }
    }
}

/// Status and decoded body of a completed request.
///
/// JSON responses are parsed; any other content type is kept as a string,
/// an empty body becomes `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Executors
// =============================================================================

/// Executes HTTP requests on behalf of the client.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Send the request and return the status and decoded body.
    ///
    /// Non-success statuses are not errors at this level.
    async fn execute(&self, request: HttpRequest) -> FindfaceResult<HttpResponse>;

    /// Executor name for logging.
    fn name(&self) -> &'static str;
}

/// Default executor backed by a pooled reqwest client.
pub struct ReqwestExecutor {
    http: Client,
}

impl ReqwestExecutor {
    /// Build a reqwest client honoring the configured timeouts and proxy.
    pub fn new(config: &FindfaceConfig) -> FindfaceResult<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("findface-client/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = config.proxy() {
            let proxy = Proxy::all(proxy).map_err(|e| {
                FindfaceError::configuration(format!("Invalid proxy '{}': {}", proxy, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(FindfaceError::Transport)?;
        Ok(Self { http })
    }

    fn multipart_form(payload: Payload) -> FindfaceResult<Form> {
        let mut form = Form::new();

        for (name, field) in payload {
            form = match field {
                Field::Photo(Photo::Bytes {
                    data,
                    file_name,
                    mime_type,
                }) => {
                    let mut part =
                        Part::bytes(data).file_name(file_name.unwrap_or_else(|| name.clone()));
                    if let Some(mime) = mime_type {
                        part = part.mime_str(&mime).map_err(|e| {
                            FindfaceError::InvalidRequest(format!(
                                "Invalid MIME type '{}': {}",
                                mime, e
                            ))
                        })?;
                    }
                    form.part(name, part)
                }
                Field::Photo(Photo::Url(url)) => form.text(name, url),
                Field::Value(value) => form.text(name, text_value(&value)),
            };
        }

        Ok(form)
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: HttpRequest) -> FindfaceResult<HttpResponse> {
        let mut builder = self.http.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(payload) => builder.multipart(Self::multipart_form(payload)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(is_json_content_type)
            .unwrap_or(false);

        let bytes = response.bytes().await?;
        debug!(status, len = bytes.len(), "FindFace response received");

        Ok(HttpResponse {
            status,
            body: decode_body(&bytes, is_json),
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Decode a response body.
///
/// A body labelled JSON that does not parse is kept as text, so the status
/// still decides how the response is classified.
fn decode_body(bytes: &[u8], is_json: bool) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    if is_json {
        match serde_json::from_slice(bytes) {
            Ok(value) => return value,
            Err(e) => debug!(error = %e, "Response labelled JSON did not parse, keeping raw text"),
        }
    }

    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

/// Form-field text for a JSON value: strings verbatim, anything else as JSON.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().to_ascii_lowercase().ends_with("json"))
        .unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_photos_are_sent_as_json() {
        let payload = Payload::from([
            ("photo".to_string(), Field::Photo(Photo::from_url("http://x/a.jpg"))),
            ("threshold".to_string(), Field::Value(json!(0.5))),
        ]);

        let body = RequestBody::encode(payload);
        assert_eq!(
            body,
            RequestBody::Json(json!({"photo": "http://x/a.jpg", "threshold": 0.5}))
        );
        assert!(!body.is_multipart());
    }

    #[test]
    fn test_binary_photos_force_multipart() {
        let payload = Payload::from([
            ("photo1".to_string(), Field::Photo(Photo::from_bytes(vec![0u8; 16]))),
            ("photo2".to_string(), Field::Photo(Photo::from_url("http://x/b.jpg"))),
            ("mf_selector".to_string(), Field::Value(json!("biggest"))),
        ]);

        let body = RequestBody::encode(payload);
        assert!(body.is_multipart());
        assert_eq!(
            body.describe(),
            "multipart[mf_selector=biggest, photo1=<16 bytes>, photo2=http://x/b.jpg]"
        );
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/html"));
        assert!(!is_json_content_type("application/jsonp-ish; x=json"));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"", true), Value::Null);
        assert_eq!(decode_body(br#"{"faces":[]}"#, true), json!({"faces": []}));
        assert_eq!(decode_body(b"plain", false), json!("plain"));
        assert_eq!(decode_body(br#"{"a":1}"#, false), json!("{\"a\":1}"));
    }

    #[test]
    fn test_malformed_json_body_is_kept_as_text() {
        assert_eq!(
            decode_body(b"<html>Bad Gateway</html>", true),
            json!("<html>Bad Gateway</html>")
        );
    }

    #[test]
    fn test_text_value() {
        assert_eq!(text_value(&json!("abc")), "abc");
        assert_eq!(text_value(&json!(3)), "3");
        assert_eq!(text_value(&json!({"x1": 1})), "{\"x1\":1}");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            method: reqwest::Method::POST,
            url: Url::parse("https://api.findface.pro/v0/detect/").unwrap(),
            headers: vec![("Authorization".into(), "Token abc".into())],
            body: RequestBody::Json(json!({})),
        };
        assert_eq!(request.header("authorization"), Some("Token abc"));
        assert_eq!(request.header("accept"), None);
    }

    #[test]
    fn test_executor_builds_with_proxy() {
        let mut config = FindfaceConfig::with_token("t");
        config.proxy = Some("http://proxy.local:3128".into());
        tokio_test::assert_ok!(ReqwestExecutor::new(&config));
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, Value::Null).is_success());
        assert!(HttpResponse::new(204, Value::Null).is_success());
        assert!(!HttpResponse::new(400, Value::Null).is_success());
    }
}

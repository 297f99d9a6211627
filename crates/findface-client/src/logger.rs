//! Request/response logging sink.

use serde_json::Value;
use tracing::debug;

use crate::transport::{HttpRequest, HttpResponse};

/// Receives every request sent and every response received by a connection.
pub trait RequestLogger: Send + Sync {
    fn log_request(&self, request: &HttpRequest);

    fn log_response(&self, request: &HttpRequest, response: &HttpResponse);
}

/// Logs bodies through `tracing` at debug level.
///
/// Headers are left out unless `log_headers` is set, and the authorization
/// value is never written.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    pub log_headers: bool,
}

impl TracingLogger {
    pub fn with_headers() -> Self {
        Self { log_headers: true }
    }

    fn headers(&self, request: &HttpRequest) -> Option<String> {
        self.log_headers.then(|| redacted_headers(request))
    }
}

impl RequestLogger for TracingLogger {
    fn log_request(&self, request: &HttpRequest) {
        let headers = self.headers(request);
        let body = request.body.describe();
        debug!(
            method = %request.method,
            url = %request.url,
            headers = headers.as_deref(),
            body = %body,
            "FindFace request"
        );
    }

    fn log_response(&self, request: &HttpRequest, response: &HttpResponse) {
        let body = match &response.body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        debug!(url = %request.url, status = response.status, body = %body, "FindFace response");
    }
}

pub(crate) fn redacted_headers(request: &HttpRequest) -> String {
    request
        .headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                format!("{}: <redacted>", name)
            } else {
                format!("{}: {}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RequestBody;
    use serde_json::json;
    use url::Url;

    fn request() -> HttpRequest {
        HttpRequest {
            method: reqwest::Method::POST,
            url: Url::parse("https://api.findface.pro/v0/verify/").unwrap(),
            headers: vec![
                ("Authorization".into(), "Token s3cr3t".into()),
                ("Accept".into(), "application/json".into()),
            ],
            body: RequestBody::Json(json!({"photo1": "a", "photo2": "b"})),
        }
    }

    #[test]
    fn test_authorization_is_redacted() {
        let rendered = redacted_headers(&request());
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("Authorization: <redacted>"));
        assert!(rendered.contains("Accept: application/json"));
    }

    #[test]
    fn test_headers_suppressed_by_default() {
        assert!(TracingLogger::default().headers(&request()).is_none());
        assert!(TracingLogger::with_headers().headers(&request()).is_some());
    }
}

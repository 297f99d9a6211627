//! Authenticated connection to the FindFace API root.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::config::FindfaceConfig;
use crate::error::{FindfaceError, FindfaceResult};
use crate::logger::RequestLogger;
use crate::request::Payload;
use crate::transport::{HttpExecutor, HttpRequest, HttpResponse, ReqwestExecutor, RequestBody};

// =============================================================================
// Connection
// =============================================================================

/// Transport handle bound to the API root and an access token.
///
/// Built from a [`FindfaceConfig`] snapshot; later config changes need a new
/// connection.
pub struct Connection {
    base_url: Url,
    authorization: String,
    executor: Arc<dyn HttpExecutor>,
    logger: Option<Arc<dyn RequestLogger>>,
}

impl Connection {
    /// Create a connection from config.
    ///
    /// Fails with a configuration error when no access token is set, before
    /// any executor is created.
    pub fn new(config: &FindfaceConfig) -> FindfaceResult<Self> {
        let token = config
            .usable_token()
            .ok_or_else(|| FindfaceError::configuration("No access token specified"))?;

        let base_url = parse_base_url(&config.endpoint)?;

        let executor: Arc<dyn HttpExecutor> = match config.executor() {
            Some(executor) => {
                if config.proxy().is_some() {
                    warn!(
                        executor = executor.name(),
                        "Proxy setting ignored: a custom executor handles its own transport"
                    );
                }
                Arc::clone(executor)
            }
            None => Arc::new(ReqwestExecutor::new(config)?),
        };

        debug!(base_url = %base_url, executor = executor.name(), "FindFace connection created");

        Ok(Self {
            base_url,
            authorization: format!("Token {}", token),
            executor,
            logger: config.logger().cloned(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the API root.
    pub fn url(&self, path: &str) -> FindfaceResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FindfaceError::InvalidRequest(format!("Invalid path '{}': {}", path, e)))
    }

    /// POST a payload and return the raw status and decoded body.
    pub async fn post(&self, path: &str, payload: Payload) -> FindfaceResult<HttpResponse> {
        let request = HttpRequest {
            method: reqwest::Method::POST,
            url: self.url(path)?,
            headers: vec![
                ("Authorization".to_string(), self.authorization.clone()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body: RequestBody::encode(payload),
        };

        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }

        debug!(url = %request.url, multipart = request.body.is_multipart(), "Sending FindFace request");

        // The executor consumes the request; keep a body-less copy for the logger.
        let logged = self.logger.as_ref().map(|_| request.clone_head());

        let response = self.executor.execute(request).await?;

        if let (Some(logger), Some(request)) = (&self.logger, &logged) {
            logger.log_response(request, &response);
        }

        Ok(response)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_base_url(endpoint: &str) -> FindfaceResult<Url> {
    let normalized = if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{}/", endpoint)
    };

    Url::parse(&normalized).map_err(|e| {
        FindfaceError::configuration(format!("Invalid endpoint '{}': {}", endpoint, e))
    })
}

// =============================================================================
// Tests
// =============================================================================

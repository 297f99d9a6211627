//! FindFace API client.
//!
//! - Lazily built, shared connection (single initialization under concurrent first use)
//! - Explicit reconfiguration that drops the cached connection
//! - Observability (tracing spans, metrics)

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info_span, Instrument};

use findface_models::BoundingBox;

use crate::config::FindfaceConfig;
use crate::connection::Connection;
use crate::error::FindfaceResult;
use crate::mapper;
use crate::metrics::record_request;
use crate::request::{build_body, build_path, Field, Payload, Photo, RequestOptions};
use crate::validator;

/// Optional parameters accepted by `verify/`.
pub const VERIFY_KEYS: &[&str] = &["bbox1", "bbox2", "threshold", "mf_selector"];

/// Optional parameters accepted by `faces/gallery/:gallery/identify/`.
pub const IDENTIFY_KEYS: &[&str] = &["bbox", "threshold", "n", "mf_selector"];

const DETECT_PATH: &str = "detect/";
const VERIFY_PATH: &str = "verify/";
const IDENTIFY_PATH: &str = "faces/gallery/:gallery/identify/";

struct ClientState {
    config: FindfaceConfig,
    connection: Option<Arc<Connection>>,
}

/// Client for the FindFace face recognition API.
///
/// Share it behind an `Arc`; every operation takes `&self`.
pub struct FindfaceClient {
    state: RwLock<ClientState>,
    connections_built: AtomicUsize,
}

impl FindfaceClient {
    /// Create a client. No connection is made until the first request.
    pub fn new(config: FindfaceConfig) -> Self {
        Self {
            state: RwLock::new(ClientState {
                config,
                connection: None,
            }),
            connections_built: AtomicUsize::new(0),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(FindfaceConfig::from_env())
    }

    /// Apply changes to the configuration.
    ///
    /// Any cached connection is dropped, so the next request picks up the new
    /// token, proxy, logger and executor. Requests already in flight keep the
    /// connection they started with.
    pub async fn configure<F>(&self, mutate: F) -> bool
    where
        F: FnOnce(&mut FindfaceConfig),
    {
        let mut state = self.state.write().await;
        mutate(&mut state.config);
        if state.connection.take().is_some() {
            debug!("FindFace configuration changed, connection invalidated");
        }
        true
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> FindfaceConfig {
        self.state.read().await.config.clone()
    }

    /// Get the shared connection, creating it on first use.
    pub async fn connection(&self) -> FindfaceResult<Arc<Connection>> {
        // Fast path: check read lock first
        {
            let state = self.state.read().await;
            if let Some(connection) = state.connection.as_ref() {
                return Ok(Arc::clone(connection));
            }
        }

        // Slow path: acquire write lock and build
        let mut state = self.state.write().await;

        // Double-check: another task may have built it while we waited
        if let Some(connection) = state.connection.as_ref() {
            return Ok(Arc::clone(connection));
        }

        let connection = Arc::new(Connection::new(&state.config)?);
        self.connections_built.fetch_add(1, Ordering::SeqCst);
        state.connection = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Number of connections created so far.
    pub fn connections_built(&self) -> usize {
        self.connections_built.load(Ordering::SeqCst)
    }

    // =========================================================================
    // API Methods
    // =========================================================================

    /// Detect faces on a photo and return their bounding boxes in response order.
    pub async fn detect(&self, photo: Photo) -> FindfaceResult<Vec<BoundingBox>> {
        self.execute_request("detect", DETECT_PATH, async {
            let payload = Payload::from([("photo".to_string(), Field::Photo(photo))]);
            let body = self.post(DETECT_PATH, payload).await?;
            mapper::to_bounding_boxes(mapper::field(&body, "faces")?)
        })
        .await
    }

    /// Check whether two photos show the same person.
    ///
    /// Accepts `bbox1`, `bbox2`, `threshold` and `mf_selector` options; other
    /// options are dropped. The response body is returned as-is.
    pub async fn verify(
        &self,
        photo1: Photo,
        photo2: Photo,
        options: &RequestOptions,
    ) -> FindfaceResult<Value> {
        self.execute_request("verify", VERIFY_PATH, async {
            let required = Payload::from([
                ("photo1".to_string(), Field::Photo(photo1)),
                ("photo2".to_string(), Field::Photo(photo2)),
            ]);
            let payload = build_body(VERIFY_KEYS, options, required);
            self.post(VERIFY_PATH, payload).await
        })
        .await
    }

    /// Search a gallery for faces similar to the one on `photo`.
    ///
    /// The gallery comes from the `gallery` option (`default` when absent).
    /// Accepts `bbox`, `threshold`, `n` and `mf_selector`. Returns the
    /// `results` member of the response untouched, `null` when it is absent.
    pub async fn identify(&self, photo: Photo, options: &RequestOptions) -> FindfaceResult<Value> {
        let path = build_path(IDENTIFY_PATH, options);

        self.execute_request("identify", &path, async {
            let required = Payload::from([("photo".to_string(), Field::Photo(photo))]);
            let payload = build_body(IDENTIFY_KEYS, options, required);
            let mut body = self.post(&path, payload).await?;
            Ok(body
                .as_object_mut()
                .and_then(|object| object.remove("results"))
                .unwrap_or(Value::Null))
        })
        .await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    async fn post(&self, path: &str, payload: Payload) -> FindfaceResult<Value> {
        let connection = self.connection().await?;
        let response = connection.post(path, payload).await?;
        validator::validate(response)
    }

    /// Execute an operation with tracing and metrics.
    async fn execute_request<T, F>(&self, operation: &str, path: &str, fut: F) -> FindfaceResult<T>
    where
        F: Future<Output = FindfaceResult<T>>,
    {
        let span = info_span!("findface_request", operation = %operation, path = %path);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        record_request(operation, outcome, latency_ms);

        result
    }
}

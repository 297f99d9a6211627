//! Response classification.
//!
//! FindFace sometimes answers `200 OK` with an error object, so both the
//! HTTP status and the body are inspected.

use serde_json::Value;

use crate::error::{FindfaceError, FindfaceResult};
use crate::transport::HttpResponse;

// =============================================================================
// Validation
// =============================================================================

/// Top-level body field the service uses to report errors.
pub const ERROR_CODE_FIELD: &str = "code";

/// Return the body of a successful response, or classify the failure.
///
/// A body carrying `code` is a [`FindfaceError::Client`] whatever the status;
/// any other non-2xx status is a [`FindfaceError::HttpStatus`].
pub fn validate(response: HttpResponse) -> FindfaceResult<Value> {
    if let Some(code) = error_code(&response.body) {
        return Err(FindfaceError::Client {
            code,
            body: response.body,
        });
    }

    if !response.is_success() {
        return Err(FindfaceError::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }

    Ok(response.body)
}

fn error_code(body: &Value) -> Option<String> {
    body.as_object()?.get(ERROR_CODE_FIELD).map(|code| match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================

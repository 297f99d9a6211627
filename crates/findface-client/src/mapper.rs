//! JSON to entity mapping.
//!
//! Keys are matched after normalization (trimmed, lowercased, leading `:`
//! removed) so `"X1"`, `":x1"` and `"x1"` all address the same coordinate.

use serde_json::{Map, Value};

use findface_models::BoundingBox;

use crate::error::{FindfaceError, FindfaceResult};

// =============================================================================
// Key Lookup
// =============================================================================

/// Canonical form of a JSON key.
pub fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches(':').to_lowercase()
}

/// Exact key first; a normalized match only when the exact key is absent.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| normalize_key(key) == name)
            .map(|(_, value)| value)
    })
}

fn coordinate(object: &Map<String, Value>, name: &str) -> FindfaceResult<f64> {
    let value = lookup(object, name)
        .ok_or_else(|| FindfaceError::mapping(format!("bounding box is missing '{}'", name)))?;

    value.as_f64().ok_or_else(|| {
        FindfaceError::mapping(format!("bounding box field '{}' is not numeric: {}", name, value))
    })
}

// =============================================================================
// Entity Mapping
// =============================================================================

/// Build a bounding box from a `{x1, y1, x2, y2}` object.
pub fn to_bounding_box(value: &Value) -> FindfaceResult<BoundingBox> {
    let object = value
        .as_object()
        .ok_or_else(|| FindfaceError::mapping(format!("bounding box is not an object: {}", value)))?;

    Ok(BoundingBox::new(
        coordinate(object, "x1")?,
        coordinate(object, "y1")?,
        coordinate(object, "x2")?,
        coordinate(object, "y2")?,
    ))
}

/// Map a `faces` array into bounding boxes, preserving order.
///
/// Entries may carry the coordinates directly or under a `bbox` key.
pub fn to_bounding_boxes(value: &Value) -> FindfaceResult<Vec<BoundingBox>> {
    let faces = value
        .as_array()
        .ok_or_else(|| FindfaceError::mapping(format!("faces is not an array: {}", value)))?;

    faces
        .iter()
        .map(|face| {
            let bbox = face
                .as_object()
                .and_then(|object| lookup(object, "bbox"))
                .filter(|bbox| bbox.is_object())
                .unwrap_or(face);
            to_bounding_box(bbox)
        })
        .collect()
}

/// Fetch a required top-level field of a response body.
pub fn field<'a>(body: &'a Value, name: &str) -> FindfaceResult<&'a Value> {
    body.as_object()
        .and_then(|object| lookup(object, name))
        .ok_or_else(|| FindfaceError::mapping(format!("response is missing '{}'", name)))
}

// =============================================================================
// Tests
// =============================================================================

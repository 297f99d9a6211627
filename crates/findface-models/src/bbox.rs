use serde::{Deserialize, Serialize};

/// A rectangle on a photo in pixel coordinates, usually a face's bounding box.
///
/// `(x1, y1)` is expected to be the top-left corner and `(x2, y2)` the
/// bottom-right one. The ordering is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// JSON object form, suitable as a `bbox`/`bbox1`/`bbox2` request option.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "x1": self.x1,
            "y1": self.y1,
            "x2": self.x2,
            "y2": self.y2,
        })
    }
}

impl From<BoundingBox> for serde_json::Value {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_json()
    }
}

//! Face records.
//!
//! A face is a single human face on a single photo: several faces may share
//! a photo, and different photos of the same person are different faces.
//! None of the client operations currently return faces; the type documents
//! the record shape FindFace stores in galleries so callers can deserialize
//! it from raw responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bbox::BoundingBox;

/// Server-assigned face identifier.
pub type FaceId = u64;

/// A face stored on the FindFace service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub id: FaceId,
    /// When the face was enrolled
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// URL of the source photo
    pub photo: String,
    #[serde(default)]
    pub photo_hash: Option<String>,
    /// URL of the face thumbnail
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub bbox: BoundingBox,
    /// Free-form metadata attached at enrollment
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub galleries: Vec<String>,
}

impl Face {
    pub fn in_gallery(&self, gallery: &str) -> bool {
        self.galleries.iter().any(|g| g == gallery)
    }
}

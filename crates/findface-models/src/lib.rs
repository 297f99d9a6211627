//! Typed entities returned by the FindFace API.
//!
//! This crate provides Serde-serializable types for:
//! - Face bounding boxes reported by `detect/`
//! - Face records as stored in FindFace galleries

pub mod bbox;
pub mod face;

// Re-export common types
pub use bbox::BoundingBox;
pub use face::{Face, FaceId};

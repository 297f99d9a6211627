//! Request composition: photo payloads, optional parameters, body filtering
//! and path templating.

use std::collections::BTreeMap;

use serde_json::Value;

/// Gallery used when a call does not name one.
pub const DEFAULT_GALLERY: &str = "default";

/// A photo to submit to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Photo {
    /// Raw image bytes, uploaded as a multipart file part.
    Bytes {
        data: Vec<u8>,
        file_name: Option<String>,
        mime_type: Option<String>,
    },
    /// Publicly reachable image URL; the service downloads it itself.
    Url(String),
}

impl Photo {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Photo::Bytes {
            data: data.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Photo::Url(url.into())
    }

    /// Attach a file name to a bytes photo. No-op for URLs.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        if let Photo::Bytes { file_name, .. } = &mut self {
            *file_name = Some(name.into());
        }
        self
    }

    /// Attach a MIME type to a bytes photo. No-op for URLs.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        if let Photo::Bytes { mime_type, .. } = &mut self {
            *mime_type = Some(mime.into());
        }
        self
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Photo::Bytes { .. })
    }
}

/// A single payload value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Photo(Photo),
    Value(Value),
}

impl From<Photo> for Field {
    fn from(photo: Photo) -> Self {
        Field::Photo(photo)
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Field::Value(value)
    }
}

/// Exact set of fields sent with one request, keyed by parameter name.
pub type Payload = BTreeMap<String, Field>;

/// Optional per-call parameters.
///
/// Besides the parameters forwarded in the body (`threshold`, `bbox`, `n`,
/// `mf_selector`...), `gallery` and `meta` feed path placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions(BTreeMap<String, Value>);

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn gallery(self, gallery: impl Into<String>) -> Self {
        self.with("gallery", gallery.into())
    }

    pub fn threshold(self, threshold: f64) -> Self {
        self.with("threshold", threshold)
    }

    pub fn mf_selector(self, selector: impl Into<String>) -> Self {
        self.with("mf_selector", selector.into())
    }

    /// Maximum number of candidates returned by `identify`.
    pub fn n(self, n: u32) -> Self {
        self.with("n", n)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build a request body from the caller's options.
///
/// Options whose key is not in `allowed_keys` are dropped; `required` is
/// overlaid last, so a required field always beats an option of the same name.
pub fn build_body(allowed_keys: &[&str], options: &RequestOptions, required: Payload) -> Payload {
    let mut payload: Payload = options
        .iter()
        .filter(|(key, _)| allowed_keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), Field::Value(value.clone())))
        .collect();

    payload.extend(required);
    payload
}

/// Resolve the `:gallery` and `:meta` placeholders of a path template.
///
/// `:gallery` falls back to `DEFAULT_GALLERY`, `:meta` to an empty string.
pub fn build_path(template: &str, options: &RequestOptions) -> String {
    let gallery = options
        .get("gallery")
        .map(path_segment)
        .unwrap_or_else(|| DEFAULT_GALLERY.to_string());
    let meta = options.get("meta").map(path_segment).unwrap_or_default();

    template.replace(":gallery", &gallery).replace(":meta", &meta)
}

fn path_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IDENTIFY: &str = "faces/gallery/:gallery/identify/";

    #[test]
    fn test_build_path_default_gallery() {
        assert_eq!(
            build_path(IDENTIFY, &RequestOptions::new()),
            "faces/gallery/default/identify/"
        );
    }

    #[test]
    fn test_build_path_named_gallery() {
        let options = RequestOptions::new().gallery("g1");
        assert_eq!(build_path(IDENTIFY, &options), "faces/gallery/g1/identify/");
    }

    #[test]
    fn test_build_path_meta_and_non_string_values() {
        let options = RequestOptions::new().with("gallery", 42).with("meta", "alice");
        assert_eq!(
            build_path("faces/gallery/:gallery/meta/:meta/", &options),
            "faces/gallery/42/meta/alice/"
        );
        assert_eq!(
            build_path("faces/meta/:meta/", &RequestOptions::new()),
            "faces/meta//"
        );
    }

    #[test]
    fn test_build_path_leaves_other_text_alone() {
        assert_eq!(build_path("detect/", &RequestOptions::new().gallery("x")), "detect/");
    }

    #[test]
    fn test_build_body_filters_and_overlays() {
        let photo = Photo::from_bytes(vec![1u8, 2, 3]);
        let options = RequestOptions::new().with("bbox", 1).with("extra", 2);
        let required = Payload::from([("photo".to_string(), Field::Photo(photo.clone()))]);

        let body = build_body(&["bbox", "threshold"], &options, required);

        let expected = Payload::from([
            ("bbox".to_string(), Field::Value(json!(1))),
            ("photo".to_string(), Field::Photo(photo)),
        ]);
        assert_eq!(body, expected);
    }

    #[test]
    fn test_required_fields_win() {
        let photo = Photo::from_url("http://example.com/face.jpg");
        let options = RequestOptions::new().with("photo", "sneaky");
        let required = Payload::from([("photo".to_string(), Field::Photo(photo.clone()))]);

        let body = build_body(&["photo"], &options, required);
        assert_eq!(body.len(), 1);
        assert_eq!(body["photo"], Field::Photo(photo));
    }

    #[test]
    fn test_gallery_is_not_a_body_field() {
        let options = RequestOptions::new().gallery("staff").threshold(0.7);
        let body = build_body(&["bbox", "threshold", "n", "mf_selector"], &options, Payload::new());
        assert!(!body.contains_key("gallery"));
        assert_eq!(body["threshold"], Field::Value(json!(0.7)));
    }

    #[test]
    fn test_photo_builders() {
        let photo = Photo::from_bytes(b"jpeg".to_vec())
            .with_file_name("face.jpg")
            .with_mime_type("image/jpeg");
        assert!(photo.is_binary());
        match photo {
            Photo::Bytes { file_name, mime_type, .. } => {
                assert_eq!(file_name.as_deref(), Some("face.jpg"));
                assert_eq!(mime_type.as_deref(), Some("image/jpeg"));
            }
            Photo::Url(_) => panic!("expected bytes photo"),
        }

        let url = Photo::from_url("http://example.com/a.jpg").with_file_name("ignored");
        assert_eq!(url, Photo::Url("http://example.com/a.jpg".into()));
        assert!(!url.is_binary());
    }
}

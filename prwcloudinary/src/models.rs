//! Data models for media API responses and the derived listing views
//!
//! `Resource` mirrors the raw listing entry returned by the media API;
//! `Track` and `GalleryImage` are the derived views served to the browser.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image formats accepted by the gallery listing
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];

/// Resource category used to scope listing queries
///
/// Audio uploads are usually classified as `Raw`, but depending on upload
/// settings some end up under `Video`, hence the fallback query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Raw,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
            ResourceKind::Video => "video",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw listing entry as reported by the media API
///
/// Snapshot per listing call; never cached across calls.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    /// Opaque identifier assigned by the provider
    pub public_id: String,
    /// Format tag (e.g. "mp3", "jpg"), absent for some raw uploads
    #[serde(default)]
    pub format: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub bytes: Option<u64>,
    /// Original filename as reported at upload time
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Provider-side filename
    #[serde(default)]
    pub filename: Option<String>,
    /// Signed delivery URL
    #[serde(default)]
    pub secure_url: Option<String>,
}

impl Resource {
    /// True for mp3 resources, by format tag or delivery URL suffix
    pub fn is_mp3(&self) -> bool {
        if self.format.as_deref() == Some("mp3") {
            return true;
        }
        self.secure_url
            .as_deref()
            .is_some_and(|url| url.ends_with(".mp3"))
    }

    /// True for resources in one of the accepted gallery image formats
    pub fn is_gallery_image(&self) -> bool {
        if let Some(format) = self.format.as_deref() {
            let suffix = format!(".{}", format.to_lowercase());
            if IMAGE_EXTENSIONS.contains(&suffix.as_str()) {
                return true;
            }
        }
        self.secure_url
            .as_deref()
            .is_some_and(|url| IMAGE_EXTENSIONS.iter().any(|ext| url.ends_with(ext)))
    }
}

/// Listing response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A playable audio track derived from a listing entry
///
/// `original_filename` is always present in the JSON (null when the provider
/// reported none); `size` and `url` are omitted when absent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    #[serde(rename = "originalFilename")]
    pub original_filename: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Track {
    /// Derives a track from a raw listing entry
    pub fn from_resource(resource: Resource) -> Self {
        let raw_name = resource
            .original_filename
            .clone()
            .or_else(|| resource.filename.clone());
        let name = naming::display_name(
            raw_name.as_deref(),
            &resource.public_id,
            resource.format.as_deref(),
        );
        Self {
            id: resource.public_id,
            original_filename: raw_name,
            name,
            size: resource.bytes,
            url: resource.secure_url,
        }
    }
}

/// A gallery image derived from a listing entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GalleryImage {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl GalleryImage {
    /// Derives a gallery image from a raw listing entry
    pub fn from_resource(resource: Resource) -> Self {
        let name = match resource.format.as_deref() {
            Some(format) => format!("{}.{}", resource.public_id, format),
            None => resource.public_id.clone(),
        };
        Self {
            id: resource.public_id,
            name,
            url: resource.secure_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(format: Option<&str>, secure_url: Option<&str>) -> Resource {
        Resource {
            public_id: "live/demo".to_string(),
            format: format.map(str::to_string),
            bytes: Some(1024),
            original_filename: None,
            filename: None,
            secure_url: secure_url.map(str::to_string),
        }
    }

    #[test]
    fn mp3_detection_by_format_tag() {
        assert!(resource(Some("mp3"), None).is_mp3());
        assert!(!resource(Some("wav"), None).is_mp3());
    }

    #[test]
    fn mp3_detection_by_url_suffix() {
        assert!(resource(None, Some("https://res.example/a.mp3")).is_mp3());
        assert!(!resource(None, Some("https://res.example/a.flac")).is_mp3());
        assert!(!resource(None, None).is_mp3());
    }

    #[test]
    fn gallery_image_detection() {
        assert!(resource(Some("jpg"), None).is_gallery_image());
        assert!(resource(Some("WEBP"), None).is_gallery_image());
        assert!(resource(None, Some("https://res.example/x.png")).is_gallery_image());
        assert!(!resource(Some("tiff"), None).is_gallery_image());
    }

    #[test]
    fn track_json_keeps_null_original_filename_and_drops_absent_url() {
        let track = Track {
            id: "t1".into(),
            original_filename: None,
            name: "demo.mp3".into(),
            size: None,
            url: None,
        };
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("originalFilename").unwrap().is_null());
        assert!(json.get("size").is_none());
        assert!(json.get("url").is_none());
    }

    #[test]
    fn gallery_image_name_appends_format() {
        let image = GalleryImage::from_resource(resource(Some("jpg"), Some("https://x/y.jpg")));
        assert_eq!(image.name, "live/demo.jpg");
    }

    #[test]
    fn resource_list_defaults_to_empty() {
        let list: ResourceList = serde_json::from_str("{}").unwrap();
        assert!(list.resources.is_empty());
    }
}

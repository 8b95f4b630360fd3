//! HTTP client for the Cloudinary Admin API
//!
//! This module provides a thin client over the resource-listing endpoints:
//! gallery image listing, audio track listing (with the video-category
//! fallback for misclassified uploads) and stream URL resolution.
//!
//! # Example
//!
//! ```no_run
//! use prwcloudinary::MediaClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MediaClient::from_config()?;
//!
//!     let tracks = client.list_tracks(Some("tracks")).await?;
//!     for track in &tracks {
//!         println!("{} ({})", track.name, track.id);
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{GalleryImage, Resource, ResourceKind, ResourceList, Track};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use prwconfig::MediaCredentials;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Cloudinary Admin API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Page size for listing queries
pub const MAX_LIST_RESULTS: u32 = 500;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PantaRei/0.1 (prwcloudinary)";

/// Cloudinary Admin API client
///
/// The client is stateless and holds no listing results between calls: every
/// listing reflects live provider state. Authentication is HTTP Basic with
/// the API key/secret pair.
#[derive(Debug, Clone)]
pub struct MediaClient {
    client: Client,
    base_url: String,
    credentials: MediaCredentials,
}

impl MediaClient {
    /// Create a client from the global configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the cloud name, API key or API
    /// secret is unset. No network activity happens here or later until a
    /// listing call is made.
    pub fn from_config() -> Result<Self> {
        let config = prwconfig::get_config();
        let credentials = config
            .get_cloudinary_credentials()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Self::builder().credentials(credentials).build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> MediaClientBuilder {
        MediaClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Listing queries
    // ========================================================================

    /// List resources of one category, optionally scoped to a folder prefix
    ///
    /// A non-success response surfaces as [`Error::Upstream`] carrying the
    /// upstream status and body verbatim.
    pub async fn list_resources(
        &self,
        kind: ResourceKind,
        prefix: Option<&str>,
    ) -> Result<Vec<Resource>> {
        self.fetch_resources(kind, prefix, MAX_LIST_RESULTS).await
    }

    /// List the gallery images
    ///
    /// Queries the image category and keeps only the accepted image formats,
    /// by format tag or delivery URL suffix.
    pub async fn list_gallery_images(&self, prefix: Option<&str>) -> Result<Vec<GalleryImage>> {
        let resources = self
            .fetch_resources(ResourceKind::Image, prefix, MAX_LIST_RESULTS)
            .await?;
        debug!(count = resources.len(), "gallery: resources listed");

        Ok(resources
            .into_iter()
            .filter(Resource::is_gallery_image)
            .map(GalleryImage::from_resource)
            .collect())
    }

    /// List the playable tracks
    ///
    /// Queries the raw category first. When that comes back empty, queries
    /// the video category once with the same prefix (some audio uploads are
    /// stored under the video endpoint depending on upload settings) and
    /// merges the results; a fallback failure is logged, never fatal. The
    /// merged set is filtered to mp3 entries and mapped to display tracks.
    pub async fn list_tracks(&self, prefix: Option<&str>) -> Result<Vec<Track>> {
        let mut resources = self
            .fetch_resources(ResourceKind::Raw, prefix, MAX_LIST_RESULTS)
            .await?;

        if resources.is_empty() {
            match self
                .fetch_resources(ResourceKind::Video, prefix, MAX_LIST_RESULTS)
                .await
            {
                Ok(alternates) => {
                    debug!(count = alternates.len(), "tracks: merged video-category fallback");
                    resources.extend(alternates);
                }
                Err(e) => {
                    warn!(error = %e, "tracks: fallback listing failed");
                }
            }
        }

        Ok(resources
            .into_iter()
            .filter(Resource::is_mp3)
            .map(Track::from_resource)
            .collect())
    }

    /// Resolve the playable URL for one opaque identifier
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the identifier matches nothing.
    pub async fn resolve_stream_url(&self, public_id: &str) -> Result<String> {
        let resources = self
            .fetch_resources(ResourceKind::Raw, Some(public_id), 1)
            .await?;
        debug!(count = resources.len(), public_id, "stream: lookup result");

        resources
            .into_iter()
            .next()
            .and_then(|r| r.secure_url)
            .ok_or_else(|| Error::NotFound(public_id.to_string()))
    }

    async fn fetch_resources(
        &self,
        kind: ResourceKind,
        prefix: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<Resource>> {
        let mut url = format!(
            "{}/{}/resources/{}/upload?max_results={}",
            self.base_url, self.credentials.cloud_name, kind, max_results
        );
        if let Some(prefix) = prefix {
            url.push_str(&format!(
                "&prefix={}",
                utf8_percent_encode(prefix, NON_ALPHANUMERIC)
            ));
        }
        debug!(%url, kind = kind.as_str(), "Cloudinary request");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let list: ResourceList = response.json().await?;
        Ok(list.resources)
    }
}

/// Builder for [`MediaClient`]
#[derive(Debug, Default)]
pub struct MediaClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    credentials: Option<MediaCredentials>,
}

impl MediaClientBuilder {
    /// Override the API base URL (useful against a test server)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the API credentials (required)
    pub fn credentials(mut self, credentials: MediaCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<MediaClient> {
        let credentials = self
            .credentials
            .ok_or_else(|| Error::configuration("Missing Cloudinary credentials"))?;

        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            )
            .build()?;

        Ok(MediaClient {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            credentials,
        })
    }
}

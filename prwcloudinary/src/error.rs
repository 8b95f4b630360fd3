//! Error types for the Cloudinary client

/// Result type alias for Cloudinary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying the media API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required credentials are absent; no upstream request was made
    #[error("Cloudinary configuration error: {0}")]
    Configuration(String),

    /// The media API returned a non-success status
    #[error("Cloudinary API error (status {status})")]
    Upstream { status: u16, details: String },

    /// A lookup matched zero resources
    #[error("File not found: {0}")]
    NotFound(String),

    /// A required request parameter is absent
    #[error("Missing required query parameter: {0}")]
    MissingParameter(&'static str),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// True when the error must surface as the upstream's own status
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}

//! Cloudinary client library for the Panta Rei site
//!
//! This crate provides the server half of the site's media features:
//!
//! - **Gallery listing**: image resources filtered to the accepted formats
//! - **Track listing**: raw audio resources with a video-category fallback
//!   for misclassified uploads, filtered to mp3, with cleaned display names
//! - **Stream resolution**: opaque identifier → playable delivery URL
//! - **REST layer**: axum handlers for `/gallery`, `/tracks` and `/stream`
//!   with the site's JSON error contract
//!
//! The media API itself is treated as an opaque HTTP dependency: every
//! operation is a single authenticated listing call (plus the one optional
//! fallback call) with filtering and mapping on the response.
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
//!     let images = client.list_gallery_images(Some("gallery")).await?;
//!     println!("{} gallery images", images.len());
//!
//!     let url = client.resolve_stream_url("tracks/demo_123456").await?;
//!     println!("stream: {url}");
//!
//!     Ok(())
//! }
//! ```

pub mod api_rest;
pub mod client;
pub mod error;
pub mod models;
pub mod naming;

// Re-exports
pub use api_rest::{MediaState, create_router};
pub use client::{MediaClient, MediaClientBuilder};
pub use error::{Error, Result};
pub use models::{GalleryImage, IMAGE_EXTENSIONS, Resource, ResourceKind, ResourceList, Track};

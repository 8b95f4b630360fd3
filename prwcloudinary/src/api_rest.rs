//! REST endpoints for the media listings
//!
//! Defines the HTTP handlers for the gallery listing, the track listing and
//! stream URL resolution. Every handler converts failures to a JSON error
//! body; unexpected faults never escape without one.
//!
//! Error contract (mirrored by the browser controllers):
//! - missing credentials → 500 `{"error": "Server configuration error"}`,
//!   decided before any upstream call
//! - upstream non-success → same status, `{"error": ..., "details": ...}`
//! - lookup miss → 404, missing parameter → 400
//! - anything else → 500 with a generic message, details in the server logs

use crate::client::MediaClient;
use crate::error::Error;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for the media endpoints
///
/// The client is `None` when the credentials are absent: the server still
/// boots and every media endpoint answers with the configuration error,
/// without issuing any upstream request.
#[derive(Clone)]
pub struct MediaState {
    client: Option<Arc<MediaClient>>,
    gallery_folder: Option<String>,
    tracks_folder: Option<String>,
}

impl MediaState {
    /// Build the state from the global configuration
    pub fn from_config() -> Self {
        let config = prwconfig::get_config();
        let client = match MediaClient::from_config() {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::error!(error = %e, "Missing Cloudinary configuration, media endpoints disabled");
                None
            }
        };
        Self {
            client,
            gallery_folder: config.get_gallery_folder(),
            tracks_folder: config.get_tracks_folder(),
        }
    }

    /// Build the state explicitly (used by tests and custom wiring)
    pub fn new(
        client: Option<Arc<MediaClient>>,
        gallery_folder: Option<String>,
        tracks_folder: Option<String>,
    ) -> Self {
        Self {
            client,
            gallery_folder,
            tracks_folder,
        }
    }

    fn client(&self) -> Result<&Arc<MediaClient>, Error> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::configuration("Cloudinary credentials are not configured"))
    }
}

/// Query parameters for the stream resolver
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    /// Opaque resource identifier
    pub id: Option<String>,
}

/// Crée le router pour les endpoints media
pub fn create_router(state: MediaState) -> Router {
    Router::new()
        .route("/gallery", get(get_gallery))
        .route("/tracks", get(get_tracks))
        .route("/stream", get(get_stream))
        .with_state(state)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/gallery
/// Returns the ordered gallery image listing
async fn get_gallery(State(state): State<MediaState>) -> Result<Response, AppError> {
    let client = state.client()?;
    let images = client
        .list_gallery_images(state.gallery_folder.as_deref())
        .await?;

    Ok((no_store(), Json(images)).into_response())
}

/// GET /api/tracks
/// Returns the ordered track listing with cleaned display names
async fn get_tracks(State(state): State<MediaState>) -> Result<Response, AppError> {
    let client = state.client()?;
    let tracks = client.list_tracks(state.tracks_folder.as_deref()).await?;

    Ok((no_store(), Json(tracks)).into_response())
}

/// GET /api/stream?id={public_id}
/// Resolves one identifier to its playable URL
async fn get_stream(
    State(state): State<MediaState>,
    Query(params): Query<StreamParams>,
) -> Result<Response, AppError> {
    let id = match params.id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(Error::MissingParameter("id").into()),
    };

    let client = state.client()?;
    let url = client.resolve_stream_url(&id).await?;

    // Resolved per session; cache briefly and privately
    let headers = [(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, max-age=30"),
    )];
    Ok((headers, Json(serde_json::json!({ "url": url }))).into_response())
}

/// Listings reflect live provider state; intermediaries must not cache them
fn no_store() -> [(header::HeaderName, HeaderValue); 1] {
    [(
        header::CACHE_CONTROL,
        HeaderValue::from_static("private, no-store"),
    )]
}

// ============ Gestion des erreurs ============

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            Error::Configuration(ref details) => {
                tracing::error!(%details, "server configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Server configuration error" }),
                )
            }
            Error::Upstream { status, details } => {
                tracing::error!(status, %details, "Cloudinary API error");
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    serde_json::json!({ "error": "Cloudinary API error", "details": details }),
                )
            }
            Error::NotFound(_) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "File not found" }),
            ),
            Error::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": format!("Missing required query parameter: {name}") }),
            ),
            other => {
                // Details stay in the server logs, never in the response
                tracing::error!(error = %other, "media endpoint failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

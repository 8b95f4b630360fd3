//! REST endpoint exposing the public site configuration
//!
//! Serves `GET /api/config` with the social links and site metadata groups.
//! Credentials never appear in this payload. Non-GET requests are answered
//! with 405 by the method router.

use crate::{Config, SiteMetadata, SocialLinks};
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Public configuration payload: the two non-secret groups.
#[derive(Debug, Clone, Serialize)]
pub struct PublicConfig {
    pub social: SocialLinks,
    pub site: SiteMetadata,
}

/// GET /api/config - public site configuration
///
/// Cacheable publicly for a short interval; the values only change on
/// redeploys.
async fn get_public_config(State(config): State<Arc<Config>>) -> Response {
    let payload = PublicConfig {
        social: config.get_social_links(),
        site: config.get_site_metadata(),
    };

    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        Json(payload),
    )
        .into_response()
}

/// Crée le router API pour la configuration publique
pub fn create_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/config", get(get_public_config))
        .with_state(config)
}

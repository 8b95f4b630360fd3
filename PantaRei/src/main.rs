use prwcloudinary::MediaState;
use prwserver::logs::LoggingOptions;
use prwserver::{Server, init_logging};
use rust_embed::RustEmbed;
use tracing::info;

/// Pages statiques du site (accueil, player, galerie)
#[derive(RustEmbed, Clone)]
#[folder = "webapp"]
struct Webapp;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingOptions::default());

    // ========== PHASE 1 : Infrastructure HTTP ==========

    let mut server = Server::new_configured();

    server
        .add_route("/info", || async {
            serde_json::json!({"version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    // ========== PHASE 2 : API du site ==========

    info!("📡 Registering site configuration API...");
    let config = prwconfig::get_config();
    server
        .add_router("/api", prwconfig::api::create_router(config))
        .await;

    info!("🎵 Registering media API...");
    let media_state = MediaState::from_config();
    server
        .add_router("/api", prwcloudinary::create_router(media_state))
        .await;

    // ========== PHASE 3 : Webapp et démarrage ==========

    info!("📡 Registering Web application...");
    server.add_dir::<Webapp>("/").await;

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ Panta Rei site is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}

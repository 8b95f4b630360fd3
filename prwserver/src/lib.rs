//! # prwserver - Serveur web haut niveau basé sur Axum
//!
//! A thin, ergonomic wrapper around axum for the Panta Rei site: compose
//! routers and static assets onto one server, then start it with graceful
//! Ctrl+C shutdown.
//!
//! ## Fonctionnalités
//!
//! - Simple JSON routes with `add_route()`
//! - Embedded static assets with `add_dir()` (RustEmbed)
//! - Sub-router mounting with `add_router()`
//! - HTTP redirections
//! - Console logging setup via [`logs::init_logging`]
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use prwserver::{ServerBuilder, logs::LoggingOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     prwserver::logs::init_logging(LoggingOptions::default());
//!
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LoggingOptions, init_logging};
pub use server::{Server, ServerBuilder, ServerInfo};

//! Console logging setup
//!
//! Initialise le système de tracing pour le serveur: sortie console avec un
//! filtre par environnement (`RUST_LOG`), et un niveau par défaut quand la
//! variable est absente.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Options de configuration du logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter applied when `RUST_LOG` is unset
    pub default_filter: String,
    /// Include target and span info in the console output
    pub verbose: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            verbose: false,
        }
    }
}

/// Initialise le système de logging
///
/// Safe to call more than once: a second initialisation is ignored, which
/// keeps tests that share a process from panicking.
pub fn init_logging(options: LoggingOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(options.verbose)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

//! Subscriber installation
use super::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. Returns false if one was already set.
pub fn init(config: &LogConfig) -> bool {
    let filter = config
        .filter
        .as_deref()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(EnvFilter::from_default_env);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .try_init()
        .is_ok()
}

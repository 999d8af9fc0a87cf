//! Tracing subscriber setup for the binary. The library never installs one.

use crate::domain::error::CouncilError;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "TRADECOUNCIL_LOG";

/// Installs a global fmt subscriber writing to stderr. `log_format` is
/// `text` or `json`. Calling this twice leaves the first subscriber in place.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), CouncilError> {
    let filter = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| log_level.to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_new(&filter).map_err(|err| CouncilError::ConfigInvalid {
            section: "log".to_string(),
            key: "level".to_string(),
            reason: format!("invalid log filter '{}': {}", filter, err),
        })?;

    let format = log_format.trim().to_lowercase();
    let result = if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

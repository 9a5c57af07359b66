//! CLI command implementations.

pub mod seed;
pub mod settings;

use lunchline_server::backend::BackendClient;
use lunchline_server::config::ServerConfig;

/// Error for commands that need the backend configured.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] lunchline_server::config::ConfigError),
    #[error("BACKEND_URL / BACKEND_SERVICE_KEY must be set for this command")]
    NoBackend,
    #[error("backend error: {0}")]
    Backend(#[from] lunchline_server::backend::BackendError),
}

/// Build a backend client from the environment, or fail loudly.
///
/// Unlike the server, the CLI has nothing useful to do offline.
pub fn backend_from_env() -> Result<BackendClient, CliError> {
    let config = ServerConfig::from_env()?;
    let backend_config = config.backend.ok_or(CliError::NoBackend)?;
    Ok(BackendClient::new(&backend_config))
}

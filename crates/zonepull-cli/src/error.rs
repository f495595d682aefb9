//! CLI error type.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the user by the zonepull binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An API call failed.
    #[error(transparent)]
    Client(#[from] zonepull_client::ClientError),

    /// Zone rendering failed.
    #[error(transparent)]
    Zone(#[from] zonepull_core::ZoneError),

    /// Reading inputs or writing outputs failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a JSON side file failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

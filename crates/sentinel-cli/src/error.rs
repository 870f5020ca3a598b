//! CLI error types

use sentinel_client::{ClientError, SigningError};
use sentinel_gate::WorkflowError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Catalog or scoring service error
    #[error("{0}")]
    Client(#[from] ClientError),

    /// Edit workflow error
    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    /// Local signer could not be set up
    #[error("Signer error: {0}")]
    Signing(#[from] SigningError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

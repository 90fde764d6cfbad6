//! Error types for the orchestrator

use thiserror::Error;
use unchained_bitcoin::ExplorerError;
use unchained_client::ClientError;
use unchained_types::WitnessError;

/// Result type for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestrationError>;

/// Errors that can occur while driving the toolkit
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("{0}")]
    Service(#[from] ClientError),

    #[error("{0}")]
    Explorer(#[from] ExplorerError),

    #[error("Failed to broadcast transaction: {0}")]
    Broadcast(ExplorerError),

    #[error("{0}")]
    Witness(#[from] WitnessError),

    /// Input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Send preconditions not met; carries the reason shown to the user
    #[error("{0}")]
    NotReady(String),

    #[error("Workflow in invalid state for operation: {0}")]
    InvalidState(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for OrchestrationError {
    fn from(err: serde_json::Error) -> Self {
        OrchestrationError::SerializationError(err.to_string())
    }
}

//! Error types for Equiptrack

use thiserror::Error;

/// Result type alias using Equiptrack's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Equiptrack error types
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Equipment {0} not found")]
    EquipmentNotFound(i64),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Caller errors (E700-E799)
    #[error("No actor identity supplied with the request")]
    MissingActor,

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::EquipmentNotFound(_) => "E001",
            Self::DatabaseError(_) => "E400",
            Self::Serialization(_) => "E401",
            Self::MissingActor => "E700",
            Self::InvalidInput(_) => "E800",
            Self::ValidationFailed(_) => "E801",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Whether the caller caused this error (as opposed to the service or store)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EquipmentNotFound(_)
                | Self::MissingActor
                | Self::InvalidInput(_)
                | Self::ValidationFailed(_)
        )
    }
}

//! Error types for the Frivolo application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::ProfileField;

/// A shared error type for the entire Frivolo application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrivoloError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (local storage operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (local storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Remote backend error (network failure or non-success response)
    #[error("Backend error: {message}")]
    Backend {
        status: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema migration error (versioned local data)
    #[error("Migration error: {0}")]
    Migration(String),

    /// User input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A calculation was attempted with unusable inputs
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    /// The requested operation is not allowed in the current flow state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A single field that failed validation, with a human readable reason.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: ProfileField,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: ProfileField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn required(field: ProfileField) -> Self {
        Self::new(field, "is required")
    }
}

/// Reasons the wage calculator refuses to produce a number.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalculationError {
    /// The profile is missing fields required by the formula.
    #[error("Incomplete profile: missing {missing:?}")]
    IncompleteProfile { missing: Vec<ProfileField> },

    /// The schedule would divide by zero or a negative number.
    #[error("Invalid work schedule: {0}")]
    InvalidSchedule(String),

    /// Hourly wage must be strictly positive to compute hours.
    #[error("Hourly wage must be positive, got {0}")]
    NonPositiveWage(f64),

    /// Durations must be finite.
    #[error("Hours value is not finite")]
    NonFiniteHours,

    /// Durations must be non-negative.
    #[error("Hours value is negative: {0}")]
    NegativeHours(f64),
}

impl FrivoloError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Backend error
    pub fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Validation error for a single field
    pub fn validation(field: ProfileField, reason: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, reason))
    }

    /// Creates an IncompleteProfile calculation error
    pub fn incomplete_profile(missing: Vec<ProfileField>) -> Self {
        Self::Calculation(CalculationError::IncompleteProfile { missing })
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a calculation error
    pub fn is_calculation(&self) -> bool {
        matches!(self, Self::Calculation(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for FrivoloError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for FrivoloError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for FrivoloError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for FrivoloError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for FrivoloError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for FrivoloError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, FrivoloError>`.
pub type Result<T> = std::result::Result<T, FrivoloError>;

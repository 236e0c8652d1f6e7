//! Error types for Agora operations

use crate::entity::EntityKind;
use std::time::Duration;
use thiserror::Error;

/// Storage layer errors.
///
/// There is no not-found variant: lookups return `Ok(None)` and deletes
/// return `Ok(false)` for missing keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("{kind} with key '{key}' already exists")]
    Conflict { kind: EntityKind, key: String },

    #[error("{field} references unknown {kind} '{key}'")]
    MissingReference {
        kind: EntityKind,
        field: &'static str,
        key: String,
    },

    #[error("Database error: {reason}")]
    Database { reason: String },

    #[error("Connection pool error: {reason}")]
    Pool { reason: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Field validation errors. `field` is a dotted path such as `members.2`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::RequiredFieldMissing { field } => field,
            ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// External NLP delegate errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NlpError {
    #[error("Request to {model} failed with status {status}: {message}")]
    RequestFailed {
        model: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {model}: {reason}")]
    InvalidResponse { model: String, reason: String },

    #[error("NLP call timed out after {after:?}")]
    Timeout { after: Duration },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Agora errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgoraError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("NLP error: {0}")]
    Nlp(#[from] NlpError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Agora operations.
pub type AgoraResult<T> = Result<T, AgoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let err = StorageError::Conflict {
            kind: EntityKind::Agent,
            key: "a1".to_string(),
        };
        assert_eq!(err.to_string(), "Agent with key 'a1' already exists");
    }

    #[test]
    fn test_missing_reference_display() {
        let err = StorageError::MissingReference {
            kind: EntityKind::Role,
            field: "role",
            key: "pilot".to_string(),
        };
        assert_eq!(err.to_string(), "role references unknown Role 'pilot'");
    }

    #[test]
    fn test_validation_field_accessor() {
        let missing = ValidationError::RequiredFieldMissing {
            field: "name".to_string(),
        };
        let invalid = ValidationError::InvalidValue {
            field: "members.1".to_string(),
            reason: "must not be blank".to_string(),
        };
        assert_eq!(missing.field(), "name");
        assert_eq!(invalid.field(), "members.1");
    }

    #[test]
    fn test_agora_error_from_storage() {
        let err: AgoraError = StorageError::LockPoisoned.into();
        assert!(matches!(err, AgoraError::Storage(StorageError::LockPoisoned)));
        assert!(err.to_string().contains("Storage lock poisoned"));
    }

    #[test]
    fn test_nlp_timeout_display() {
        let err = NlpError::Timeout {
            after: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("30s"));
    }
}

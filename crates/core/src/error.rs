// Central Error Type for repokit

use std::fmt;
use thiserror::Error;

/// Which database constraint a write violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    NotNull,
    ForeignKey,
    Check,
    TypeMismatch,
    Other,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::NotNull => write!(f, "not null"),
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
            ConstraintKind::Check => write!(f, "check"),
            ConstraintKind::TypeMismatch => write!(f, "type mismatch"),
            ConstraintKind::Other => write!(f, "constraint"),
        }
    }
}

/// Application-level error type
///
/// Not-found is never an error: lookups return `None`, singular mutations
/// return `false` and bulk mutations return `0`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Raised by the data store; `code` and `message` are the driver's own
    #[error("Constraint violation ({kind}): {message}")]
    Constraint {
        kind: ConstraintKind,
        code: Option<String>,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The constraint kind, if this error is a constraint violation
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            AppError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in the infra-sqlite crate
// by classifying into AppError::Constraint / AppError::Database

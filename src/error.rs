use thiserror::Error;

use crate::value::TypeViolation;

#[derive(Debug, Error)]
pub enum TessellaError {
    #[error("storage error: {message}")]
    Storage { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("configuration error: {message}")]
    Config { message: String },
    #[error("unresolved {kind}: {}", .paths.join(", "))]
    Unresolved { kind: &'static str, paths: Vec<String> },
    #[error("validation failed for {} cell(s): {}", .violations.len(), join_violations(.violations))]
    Validation { violations: Vec<TypeViolation> },
}

impl TessellaError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn unresolved(kind: &'static str, paths: Vec<String>) -> Self {
        Self::Unresolved { kind, paths }
    }

    pub fn validation(violations: Vec<TypeViolation>) -> Self {
        Self::Validation { violations }
    }
}

pub type TessellaResult<T> = Result<T, TessellaError>;

impl From<sea_orm::DbErr> for TessellaError {
    fn from(value: sea_orm::DbErr) -> Self {
        TessellaError::storage(value.to_string())
    }
}

fn join_violations(violations: &[TypeViolation]) -> String {
    violations
        .iter()
        .map(|violation| violation.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

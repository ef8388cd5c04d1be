// Service error taxonomy shared by pagination, file URLs and listing services
use std::collections::HashMap;
use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Misconfiguration or misuse detected before any I/O happens
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// External collaborator (cache store, URL signer) failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ServiceError::Configuration(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ServiceError::Upstream(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn field_validation(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ServiceError::Validation {
            message,
            field_errors: Some(field_errors),
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Configuration(_) => "CONFIGURATION_ERROR",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Upstream(_) => "UPSTREAM_ERROR",
            ServiceError::Validation { .. } => "VALIDATION_ERROR",
            ServiceError::Database(DatabaseError::NotFound(_)) => "NOT_FOUND",
            ServiceError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.error_code() == "NOT_FOUND"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_validation_carries_field_errors() {
        let err = ServiceError::field_validation("limit", "limit must be at least 1");
        match err {
            ServiceError::Validation { message, field_errors } => {
                assert_eq!(message, "limit must be at least 1");
                assert_eq!(field_errors.unwrap().get("limit").map(String::as_str), Some("limit must be at least 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn database_not_found_maps_to_not_found_code() {
        let err: ServiceError = DatabaseError::NotFound("Sermon not found".to_string()).into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Sermon not found");
    }
}

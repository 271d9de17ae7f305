//! # Error Handling
//!
//! Error types for the enforcer core using `thiserror`.
//!
//! The error taxonomy mirrors how failures are surfaced to callers:
//! configuration defects are logged and degraded around, entitlement misses
//! become structured unauthorized results (never an `Err`), and only wiring
//! bugs and unexpected internal faults travel through this error channel.

/// Custom result type for enforcer operations.
pub type Result<T> = std::result::Result<T, EnforcerError>;

/// Main error type for the enforcer core.
#[derive(thiserror::Error, Debug)]
pub enum EnforcerError {
    /// Invalid enforcer, filter, or API configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation was invoked out of its documented contract order
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Unexpected internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EnforcerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new contract-violation error
    pub fn contract<S: Into<String>>(message: S) -> Self {
        Self::ContractViolation(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

impl From<validator::ValidationErrors> for EnforcerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::config(format!("Validation failed: {}", message))
    }
}

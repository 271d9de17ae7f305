//! # Configuration Settings
//!
//! Defines the configuration structure consumed by the filter-chain pipeline
//! and response assembly.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::Result;

/// Enforcer core configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct EnforcerConfig {
    /// Authorization-header handling
    #[validate(nested)]
    pub auth_header: AuthHeaderConfig,

    /// Analytics hook configuration
    #[validate(nested)]
    pub analytics: AnalyticsConfig,

    /// Custom filter stages declared for the chain
    #[validate(nested)]
    pub custom_filters: Vec<CustomFilterConfig>,
}

impl EnforcerConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)?;
        self.validate_custom()?;
        Ok(())
    }

    /// Custom validation logic that goes beyond what the validator crate can do
    fn validate_custom(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for filter in &self.custom_filters {
            if !seen.insert(filter.name.as_str()) {
                return Err(crate::errors::EnforcerError::config(format!(
                    "Custom filter '{}' is declared more than once",
                    filter.name
                )));
            }
        }
        Ok(())
    }
}

/// Authorization-header behavior.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthHeaderConfig {
    /// Header carrying the caller's credential when the API does not
    /// override it
    #[validate(length(min = 1, message = "Authorization header name cannot be empty"))]
    pub authorization_header: String,

    /// Forward the inbound authorization header to the backend instead of
    /// stripping it
    pub enable_outbound_auth_header: bool,
}

impl Default for AuthHeaderConfig {
    fn default() -> Self {
        Self { authorization_header: "authorization".to_string(), enable_outbound_auth_header: false }
    }
}

/// Analytics hook behavior.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AnalyticsConfig {
    /// Run the success/failure analytics hooks
    pub enabled: bool,

    /// Error codes whose failure events are not reported
    pub skip_fault_error_codes: Vec<String>,
}

impl AnalyticsConfig {
    /// Whether a failure event with the given error code should bypass the
    /// failure hook.
    pub fn is_skipped_fault_event(&self, error_code: Option<&str>) -> bool {
        match error_code {
            Some(code) => self.skip_fault_error_codes.iter().any(|c| c == code),
            None => false,
        }
    }
}

/// A custom filter stage declaration: registry name plus the 1-based chain
/// position it should be inserted at.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomFilterConfig {
    /// Name the stage was registered under
    #[validate(length(min = 1, message = "Filter name cannot be empty"))]
    pub name: String,

    /// 1-based insertion position. Positions outside the current chain
    /// bounds are rejected at chain assembly, not here, so that one bad
    /// stage never takes down the rest of the chain.
    pub position: i32,
}

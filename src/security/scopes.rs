//! Token scope validation against a matched resource.

use std::sync::Arc;

use tracing::debug;

use crate::errors::{EnforcerError, Result};
use crate::model::{ResourceConfig, ValidationResult, ValidationStatus};

/// Inputs to a scope-validation run. Built after key validation, once per
/// request.
pub struct TokenValidationContext {
    /// The decision was already validated for this token; skip re-checking
    pub cache_hit: bool,
    /// Raw access token, used for debug traces only
    pub token: String,
    pub matched_resource: Arc<ResourceConfig>,
    /// Result of the preceding key validation. Must be present; calling
    /// scope validation without it is a wiring bug.
    pub validation_result: Option<ValidationResult>,
}

/// Check the token's scopes against the matched resource's security map.
///
/// The resource is satisfied if **any** declared scheme entry is satisfied
/// (schemes are alternatives, not conjunctions): a scheme with required
/// scopes needs one of them present on the token, while a scheme with an
/// empty scope list marks a scope-less credential kind and is satisfied by
/// tokens carrying no scopes, or by any token when the resource declares no
/// scope-bearing scheme at all. An empty security map means no scope
/// constraint whatsoever.
///
/// On failure the attached validation result is marked unauthorized with
/// [`ValidationStatus::InvalidScope`] and `Ok(false)` is returned.
///
/// # Errors
///
/// Returns a contract-violation error when no validation result is attached,
/// since key validation must run first.
pub fn validate_scopes(context: &mut TokenValidationContext) -> Result<bool> {
    if context.cache_hit {
        return Ok(true);
    }

    let result = context
        .validation_result
        .as_mut()
        .ok_or_else(|| EnforcerError::contract("Key validation information not set"))?;

    if !result.token_scopes.is_empty() {
        debug!(
            token = context.token.as_str(),
            scopes = ?result.token_scopes,
            "Scopes allowed for token"
        );
    }

    let schemes = &context.matched_resource.security_schemes;
    let has_scoped_scheme = schemes.values().any(|scopes| !scopes.is_empty());
    let mut validated = schemes.is_empty();
    for required_scopes in schemes.values() {
        if required_scopes.is_empty() {
            if result.token_scopes.is_empty() || !has_scoped_scheme {
                validated = true;
            }
        } else if required_scopes.iter().any(|scope| result.token_scopes.contains(scope)) {
            validated = true;
            break;
        }
    }

    if !validated {
        result.authorized = false;
        result.status = ValidationStatus::InvalidScope;
    }
    Ok(validated)
}

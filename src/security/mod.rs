//! # Key and Scope Validation
//!
//! Resolves a caller's credential to its application, subscription, and tier
//! policies, and validates token scopes against the matched resource's
//! declared security requirements.

mod key_validator;
mod scopes;

pub use key_validator::KeyValidator;
pub use scopes::{validate_scopes, TokenValidationContext};

/// Tenant domain used when the API context carries no tenant prefix.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

/// Context prefix marking a tenant-qualified API, `/t/<domain>/...`.
pub const TENANT_CONTEXT_PREFIX: &str = "/t/";

/// Version prefix marking an invocation through the default-version alias.
pub const DEFAULT_VERSION_PREFIX: &str = "_default_";

/// Extract the tenant domain from an API context path.
///
/// Tenant APIs are deployed under `/t/<domain>/...`; anything else belongs
/// to the super tenant and yields `None`.
pub fn tenant_domain_from_context(context: &str) -> Option<&str> {
    let rest = context.strip_prefix(TENANT_CONTEXT_PREFIX)?;
    let domain = rest.split('/').next().unwrap_or_default();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Split the default-version alias off a version string.
///
/// Returns whether the alias was present and the version to use for lookups.
pub fn split_default_version(version: &str) -> (bool, &str) {
    match version.strip_prefix(DEFAULT_VERSION_PREFIX) {
        Some(stripped) => (true, stripped),
        None => (false, version),
    }
}

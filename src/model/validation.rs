//! Key/subscription validation result types.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::subscription::KeyType;

/// Outcome code of a key/subscription validation run.
///
/// `Ok` doubles as the unset default; the validator guarantees every
/// unauthorized result leaving its boundary carries a non-`Ok` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    #[default]
    Ok,
    /// The API or the subscription to it is blocked
    ApiBlocked,
    /// The subscription exists but is on hold or was rejected
    SubscriptionInactive,
    /// Token scopes do not satisfy the matched resource's requirements
    InvalidScope,
    /// Some entity in the identity -> entitlement chain could not be resolved
    ResourceForbidden,
    /// Resolution failed for an unexpected internal reason
    InternalServerError,
}

/// Normalized output of the key/subscription validator.
///
/// Either `authorized` is true and every entitlement field is populated, or
/// `authorized` is false with a non-`Ok` status and entitlement fields left
/// at their defaults. Partial population never escapes the validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub authorized: bool,
    pub status: ValidationStatus,

    pub subscriber: String,
    pub application_uuid: String,
    pub application_name: String,
    pub application_tier: String,
    pub app_attributes: HashMap<String, String>,
    pub subscriber_tenant_domain: String,

    pub api_uuid: String,
    pub api_name: String,
    pub api_version: String,
    pub api_publisher: String,
    /// API-level tier; only set when the API declares a non-blank tier
    pub api_tier: String,
    /// Subscription tier (the subscription policy name)
    pub tier: String,

    pub key_type: Option<KeyType>,
    /// Scopes carried by the caller's token, used by scope validation
    pub token_scopes: HashSet<String>,

    /// Whether any applicable tier policy throttles on request content
    pub content_aware: bool,
    /// Burst limit; zero means no spike arrest configured
    pub spike_arrest_limit: u32,
    pub spike_arrest_unit: Option<String>,
    pub stop_on_quota_reach: bool,
    pub graphql_max_depth: u32,
    pub graphql_max_complexity: u32,
    /// Throttling condition identifiers associated with the API
    pub throttling_data_list: Vec<String>,

    /// The request used the default-version alias rather than an explicit
    /// version; informational only
    pub default_version_invoked: bool,
}

impl ValidationResult {
    /// An unauthorized result with the given status and all entitlement
    /// fields at their defaults.
    pub fn unauthorized(status: ValidationStatus) -> Self {
        Self { authorized: false, status, ..Default::default() }
    }
}

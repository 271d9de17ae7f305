//! # Subscription Index
//!
//! Entitlement entities and the lookup contract the key validator consumes.
//!
//! The index itself is owned by an external updater (event ingestion or REST
//! bootstrap); this module defines the entities, the [`SubscriptionStore`]
//! point-lookup trait, and a tenant-scoped holder mapping tenant domains to
//! store handles. Lookups must be snapshot consistent: a read concurrent
//! with an update sees either the old or the new entity, never a partial
//! write. [`InMemorySubscriptionStore`] satisfies that with `DashMap` tables
//! and is the store used by embedders that ingest updates in-process.

mod memory;

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::InMemorySubscriptionStore;

/// Lifecycle state of a deployed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Created,
    Published,
    Blocked,
    Deprecated,
    Retired,
}

/// State of a subscription between an application and an API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionState {
    Active,
    Blocked,
    OnHold,
    Rejected,
    ProdOnlyBlocked,
}

/// Consumer-key type: which backend a key is entitled to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    Production,
    Sandbox,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Production => "PRODUCTION",
            KeyType::Sandbox => "SANDBOX",
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = KeyTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PRODUCTION" => Ok(KeyType::Production),
            "SANDBOX" => Ok(KeyType::Sandbox),
            other => Err(KeyTypeParseError(other.to_string())),
        }
    }
}

/// Error returned when a key type string is unrecognized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid key type: {0}")]
pub struct KeyTypeParseError(pub String);

/// An API as known to the subscription index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    pub uuid: String,
    pub name: String,
    pub version: String,
    pub context: String,
    pub provider: String,
    /// API-level tier policy name; blank when none applies
    pub api_tier: String,
    pub lifecycle_state: LifecycleState,
}

/// A consumer application owning one or more keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub uuid: String,
    pub name: String,
    /// Owning subscriber's name
    pub subscriber: String,
    /// Application tier policy name
    pub policy: String,
    pub tenant_domain: String,
    pub attributes: std::collections::HashMap<String, String>,
}

/// Binding from a consumer key (under a key manager) to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationKeyMapping {
    pub consumer_key: String,
    pub key_manager: String,
    pub application_uuid: String,
    pub key_type: KeyType,
}

/// A subscription of an application to an API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub application_uuid: String,
    pub api_uuid: String,
    pub state: SubscriptionState,
    /// Subscription tier policy name
    pub policy_id: String,
}

/// Application tier policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPolicy {
    pub name: String,
    pub content_aware: bool,
}

/// Subscription tier policy, carrying the burst and quota hints the
/// throttling layer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPolicy {
    pub name: String,
    pub content_aware: bool,
    pub rate_limit_count: u32,
    pub rate_limit_time_unit: Option<String>,
    pub stop_on_quota_reach: bool,
    pub graphql_max_depth: u32,
    pub graphql_max_complexity: u32,
}

/// API tier policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPolicy {
    pub name: String,
    pub content_aware: bool,
}

/// Point-lookup contract over a tenant's subscription data.
///
/// Implementations must not block on the lookup path and must return
/// snapshot-consistent entities under concurrent updates.
pub trait SubscriptionStore: Send + Sync {
    fn api_by_context_and_version(&self, uuid: &str) -> Option<Api>;
    fn key_mapping_by_key_and_key_manager(
        &self,
        consumer_key: &str,
        key_manager: &str,
    ) -> Option<ApplicationKeyMapping>;
    fn application_by_id(&self, uuid: &str) -> Option<Application>;
    fn subscription_by_ids(&self, application_uuid: &str, api_uuid: &str) -> Option<Subscription>;
    fn application_policy_by_name(&self, name: &str) -> Option<ApplicationPolicy>;
    fn subscription_policy_by_name(&self, name: &str) -> Option<SubscriptionPolicy>;
    fn api_policy_by_name(&self, name: &str) -> Option<ApiPolicy>;
}

/// Tenant-scoped registry of subscription stores.
///
/// Passed explicitly into the validator rather than read from ambient global
/// state, so validation is unit-testable against fake stores.
#[derive(Default)]
pub struct SubscriptionDataHolder {
    stores: DashMap<String, Arc<dyn SubscriptionStore>>,
}

impl SubscriptionDataHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the store serving a tenant domain.
    pub fn register_store(&self, tenant_domain: impl Into<String>, store: Arc<dyn SubscriptionStore>) {
        self.stores.insert(tenant_domain.into(), store);
    }

    pub fn store_for_tenant(&self, tenant_domain: &str) -> Option<Arc<dyn SubscriptionStore>> {
        self.stores.get(tenant_domain).map(|entry| Arc::clone(entry.value()))
    }
}

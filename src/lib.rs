//! # Vigil
//!
//! Vigil is the request-authorization core of an API-gateway enforcer. For
//! every inbound API call it decides, on the synchronous request path,
//! whether the call is authenticated, subscribed, scope-permitted, and
//! policy-compliant, producing either a pass-through directive (with header
//! mutations) or a direct-deny response.
//!
//! ## Architecture
//!
//! ```text
//! Transport Layer → RestApi.process → Filter Chain → Response Directive
//!                                        ↓
//!                          Key Validator / Scope Validator
//!                                        ↓
//!                              Subscription Index
//! ```
//!
//! ## Core Components
//!
//! - **API Assembly** (`api`): declarative API description → immutable
//!   [`ApiConfig`](model::ApiConfig), per-API chain, response assembly
//! - **Filter Chain** (`filters`): ordered, short-circuiting decision
//!   stages with positional custom-stage insertion
//! - **Key/Scope Validation** (`security`): credential → application →
//!   subscription → tier policies, plus token-scope checks
//! - **Subscription Index** (`subscription`): entitlement entities and the
//!   tenant-scoped lookup contract
//!
//! Transport framing, credential cryptography, index population, and
//! rate-limit bookkeeping stay with the embedding service; this crate only
//! consumes their interfaces.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use vigil::analytics::NoopAnalytics;
//! use vigil::api::{ApiDescriptor, RestApi};
//! use vigil::config::EnforcerConfig;
//! use vigil::filters::{FilterRegistry, NoopRateLimiter};
//! use vigil::subscription::SubscriptionDataHolder;
//!
//! let descriptor = ApiDescriptor { title: "PetStore".into(), ..Default::default() };
//! let api = RestApi::new(
//!     &descriptor,
//!     Arc::new(EnforcerConfig::default()),
//!     &FilterRegistry::new(),
//!     Arc::new(SubscriptionDataHolder::new()),
//!     Arc::new(NoopRateLimiter),
//!     Arc::new(NoopAnalytics),
//! );
//! assert_eq!(api.stage_names(), vec!["cors", "auth", "throttle"]);
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod filters;
pub mod model;
pub mod security;
pub mod subscription;

pub use errors::{EnforcerError, Result};

//! # Configuration
//!
//! Typed configuration for the enforcer core. Loading machinery (files,
//! environment, remote discovery) lives with the embedding service; this
//! module only defines the validated settings structures the pipeline and
//! validators consume.

mod settings;

pub use settings::{AnalyticsConfig, AuthHeaderConfig, CustomFilterConfig, EnforcerConfig};

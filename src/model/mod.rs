//! # Shared Data Model
//!
//! Immutable per-API configuration, the per-request mutable context, and the
//! key-validation result types shared by the pipeline and the validators.

mod api;
mod context;
mod validation;

pub use api::{
    ApiConfig, EndpointSecurity, EndpointSecurityInfo, HttpMethod, HttpMethodParseError,
    ResourceConfig, SecuritySchemeDefinition,
};
pub use context::{AuthenticationContext, DenyDetails, RequestContext};
pub use validation::{ValidationResult, ValidationStatus};

//! # API Assembly
//!
//! Converts a declarative API description into the immutable runtime
//! configuration, owns the per-API filter chain, and assembles the response
//! directive from each chain walk.

mod builder;
mod descriptor;
mod rest_api;

pub use builder::build_api_config;
pub use descriptor::{
    ApiDescriptor, EndpointDescriptor, OperationDescriptor, ResourceDescriptor,
    SecuritySchemeDescriptor,
};
pub use rest_api::{ResponseObject, RestApi};

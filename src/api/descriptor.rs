//! Declarative API description, as delivered by the control plane.
//!
//! These are the raw inputs to [`build_api_config`](super::build_api_config);
//! nothing downstream of the builder reads them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::EndpointSecurity;

/// Full description of one API deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApiDescriptor {
    pub id: String,
    pub title: String,
    pub version: String,
    pub vhost: String,
    pub base_path: String,
    pub api_type: String,
    pub organization_id: String,
    pub lifecycle_state: String,
    pub tier: String,
    pub authorization_header: String,
    pub disable_security: bool,
    pub security_schemes: Vec<SecuritySchemeDescriptor>,
    pub resources: Vec<ResourceDescriptor>,
    pub endpoint_security: EndpointSecurity,
    pub production_endpoints: Vec<EndpointDescriptor>,
    pub sandbox_endpoints: Vec<EndpointDescriptor>,
}

/// A named security scheme declaration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecuritySchemeDescriptor {
    /// Name operations reference this scheme by
    pub definition_name: String,
    /// Scheme type, e.g. `oauth2` or `apiKey`
    pub scheme_type: String,
    /// Header or query parameter name carrying the credential
    pub name: String,
    /// `header` or `query`
    pub location: String,
}

/// A path and the operations declared on it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResourceDescriptor {
    pub path: String,
    pub operations: Vec<OperationDescriptor>,
}

/// One operation (method) on a resource path.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OperationDescriptor {
    pub method: String,
    pub tier: String,
    pub disable_security: bool,
    /// Security requirements: each entry maps scheme names to the scopes
    /// that scheme requires for this operation
    pub security: Vec<HashMap<String, Vec<String>>>,
}

/// A structured backend endpoint, assembled into a URL by the builder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EndpointDescriptor {
    /// URL scheme, e.g. `http` or `https`
    pub url_type: String,
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

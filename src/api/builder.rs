//! Builds the immutable per-API configuration from a declarative
//! description.

use std::collections::HashMap;

use tracing::error;

use crate::model::{ApiConfig, ResourceConfig, SecuritySchemeDefinition};

use super::descriptor::{ApiDescriptor, EndpointDescriptor, OperationDescriptor};

const API_KEY_SCHEME_TYPE: &str = "apiKey";

/// Convert a declarative API description into an [`ApiConfig`].
///
/// Pure construction: calling this twice on the same description yields two
/// field-for-field identical configurations, and already published configs
/// are never touched.
pub fn build_api_config(descriptor: &ApiDescriptor) -> ApiConfig {
    let mut scheme_definitions: HashMap<String, SecuritySchemeDefinition> = HashMap::new();
    for scheme in &descriptor.security_schemes {
        if scheme.scheme_type.is_empty() {
            continue;
        }
        // Later declarations of the same type overwrite earlier ones.
        scheme_definitions.insert(
            scheme.scheme_type.clone(),
            SecuritySchemeDefinition {
                definition_name: scheme.definition_name.clone(),
                scheme_type: scheme.scheme_type.clone(),
                name: scheme.name.clone(),
                location: scheme.location.clone(),
            },
        );
    }

    let api_key_scheme_name = api_key_scheme_name(&scheme_definitions);

    let mut resources = Vec::new();
    for resource in &descriptor.resources {
        for operation in &resource.operations {
            match build_resource(operation, &resource.path, api_key_scheme_name.as_deref()) {
                Some(config) => resources.push(config),
                None => error!(
                    api = descriptor.title.as_str(),
                    path = resource.path.as_str(),
                    method = operation.method.as_str(),
                    "Unsupported HTTP method in API description, operation skipped"
                ),
            }
        }
    }

    ApiConfig {
        uuid: descriptor.id.clone(),
        name: descriptor.title.clone(),
        version: descriptor.version.clone(),
        vhost: descriptor.vhost.clone(),
        base_path: descriptor.base_path.clone(),
        organization_id: descriptor.organization_id.clone(),
        api_type: descriptor.api_type.clone(),
        lifecycle_state: descriptor.lifecycle_state.clone(),
        tier: descriptor.tier.clone(),
        auth_header: descriptor.authorization_header.clone(),
        disable_security: descriptor.disable_security,
        security_scheme_definitions: scheme_definitions,
        resources,
        endpoint_security: descriptor.endpoint_security.clone(),
        production_urls: process_endpoints(&descriptor.production_endpoints),
        sandbox_urls: process_endpoints(&descriptor.sandbox_endpoints),
    }
}

/// The definition name of the API-key scheme, when the API declares one.
/// Operation security lists reference schemes by this arbitrary name.
fn api_key_scheme_name(
    definitions: &HashMap<String, SecuritySchemeDefinition>,
) -> Option<String> {
    definitions
        .values()
        .find(|definition| definition.scheme_type.eq_ignore_ascii_case(API_KEY_SCHEME_TYPE))
        .map(|definition| definition.definition_name.clone())
}

fn build_resource(
    operation: &OperationDescriptor,
    path: &str,
    api_key_scheme_name: Option<&str>,
) -> Option<ResourceConfig> {
    let method = operation.method.parse().ok()?;

    let mut security_schemes: HashMap<String, Vec<String>> = HashMap::new();
    for requirement in &operation.security {
        for (scheme_name, scopes) in requirement {
            if !scopes.is_empty() {
                security_schemes.insert(scheme_name.clone(), scopes.clone());
            }
            // The API-key scheme is recorded even without scopes: required,
            // no scope constraint.
            if api_key_scheme_name
                .map(|name| scheme_name.eq_ignore_ascii_case(name))
                .unwrap_or(false)
            {
                security_schemes.entry(scheme_name.clone()).or_default();
            }
        }
    }

    Some(ResourceConfig {
        path: path.to_string(),
        method,
        tier: operation.tier.clone(),
        disable_security: operation.disable_security,
        security_schemes,
    })
}

fn process_endpoints(endpoints: &[EndpointDescriptor]) -> Vec<String> {
    endpoints
        .iter()
        .map(|endpoint| {
            format!(
                "{}://{}:{}{}",
                endpoint.url_type.to_lowercase(),
                endpoint.host,
                endpoint.port,
                endpoint.base_path
            )
        })
        .collect()
}

//! Immutable per-API configuration shared read-only across requests.
//!
//! An [`ApiConfig`] is built once per API deployment and published behind an
//! `Arc`; concurrent request flows only ever read it. Rebuilding an API
//! produces a fresh instance, it never mutates one already in circulation.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP methods an API resource can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpMethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(HttpMethodParseError(other.to_string())),
        }
    }
}

/// Error returned when an HTTP method string is not in the supported set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported HTTP method: {0}")]
pub struct HttpMethodParseError(pub String);

/// A named security scheme declared by the API definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySchemeDefinition {
    /// Name the definition is referenced by from operation security lists
    pub definition_name: String,
    /// Scheme type, e.g. `oauth2` or `apiKey`
    pub scheme_type: String,
    /// Header or query parameter carrying the credential
    pub name: String,
    /// Credential location: `header` or `query`
    pub location: String,
}

/// Credentials the gateway presents to a backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointSecurityInfo {
    pub enabled: bool,
    pub security_type: String,
    pub username: String,
    pub password: String,
    pub custom_parameters: HashMap<String, String>,
}

/// Endpoint security for the production and sandbox backends, converted
/// independently; a backend without security info stays unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointSecurity {
    pub production: Option<EndpointSecurityInfo>,
    pub sandbox: Option<EndpointSecurityInfo>,
}

/// One (path, method) operation of an API.
///
/// `security_schemes` maps a scheme's definition name to the scopes it
/// requires. An empty scope list means the scheme is required but carries no
/// scope constraint; a scheme that is not required at all is simply absent
/// from the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub path: String,
    pub method: HttpMethod,
    pub tier: String,
    pub disable_security: bool,
    pub security_schemes: HashMap<String, Vec<String>>,
}

impl ResourceConfig {
    /// Whether a request path matches this resource's path template,
    /// tolerating a single trailing slash on the template.
    pub fn matches_path(&self, resource_path: &str) -> bool {
        let resource = resource_path.trim();
        let pattern = self.path.trim();

        if resource.eq_ignore_ascii_case(pattern) {
            return true;
        }

        if resource.len() + 1 == pattern.len() && pattern.ends_with('/') {
            return resource.eq_ignore_ascii_case(&pattern[..pattern.len() - 1]);
        }

        false
    }
}

/// Immutable configuration for one deployed API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    pub uuid: String,
    pub name: String,
    pub version: String,
    pub vhost: String,
    pub base_path: String,
    pub organization_id: String,
    pub api_type: String,
    pub lifecycle_state: String,
    pub tier: String,
    /// API-level override for the credential header; empty means the
    /// enforcer-wide default applies
    pub auth_header: String,
    pub disable_security: bool,
    /// Security scheme definitions keyed by scheme type; later declarations
    /// of the same type overwrite earlier ones
    pub security_scheme_definitions: HashMap<String, SecuritySchemeDefinition>,
    pub resources: Vec<ResourceConfig>,
    pub endpoint_security: EndpointSecurity,
    pub production_urls: Vec<String>,
    pub sandbox_urls: Vec<String>,
}

impl ApiConfig {
    /// The header name carrying the caller's credential for this API,
    /// falling back to the enforcer-wide default when the API declares none.
    pub fn auth_header_name<'a>(&'a self, default_header: &'a str) -> &'a str {
        if self.auth_header.is_empty() {
            default_header
        } else {
            &self.auth_header
        }
    }

    /// Find the resource matching a request path and method.
    pub fn find_resource(&self, path: &str, method: HttpMethod) -> Option<&ResourceConfig> {
        self.resources
            .iter()
            .find(|resource| resource.method == method && resource.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_method_round_trip() {
        for (input, expected) in [
            ("GET", HttpMethod::Get),
            ("post", HttpMethod::Post),
            ("Put", HttpMethod::Put),
            ("DELETE", HttpMethod::Delete),
            ("PATCH", HttpMethod::Patch),
            ("HEAD", HttpMethod::Head),
            ("OPTIONS", HttpMethod::Options),
        ] {
            let parsed = input.parse::<HttpMethod>().unwrap();
            assert_eq!(parsed, expected);
        }

        let err = "TRACE".parse::<HttpMethod>().unwrap_err();
        assert_eq!(err.0, "TRACE");
    }

    #[test]
    fn path_match_tolerates_trailing_slash_on_template() {
        let resource = ResourceConfig {
            path: "/pets/".to_string(),
            method: HttpMethod::Get,
            tier: String::new(),
            disable_security: false,
            security_schemes: HashMap::new(),
        };

        assert!(resource.matches_path("/pets/"));
        assert!(resource.matches_path("/pets"));
        assert!(!resource.matches_path("/pet"));
        assert!(!resource.matches_path("/pets/1"));
    }

    #[test]
    fn auth_header_falls_back_to_default() {
        let mut api = ApiConfig { auth_header: String::new(), ..Default::default() };
        assert_eq!(api.auth_header_name("authorization"), "authorization");

        api.auth_header = "x-api-auth".to_string();
        assert_eq!(api.auth_header_name("authorization"), "x-api-auth");
    }
}

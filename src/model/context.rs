//! Per-request mutable context.
//!
//! A [`RequestContext`] is created by the transport layer once routing has
//! matched an API and a resource, threaded through the filter chain, and
//! discarded after response assembly. It is exclusively owned by one request
//! flow and never shared across requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use http::StatusCode;
use uuid::Uuid;

use crate::model::{ApiConfig, ResourceConfig, ValidationResult};

/// Authentication state attached to a request by the auth stage.
///
/// Defaults to unauthenticated; consumers read a default instance rather
/// than handling an absent context.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationContext {
    pub authenticated: bool,
    pub consumer_key: String,
    pub key_manager: String,
    pub token: String,
    pub token_scopes: HashSet<String>,
    pub validation_result: Option<ValidationResult>,
}

/// Details a filter stage records when it stops the chain.
///
/// The status code is mandatory for any stop; its absence at response
/// assembly is a configuration defect in the stopping stage, surfaced in
/// logs rather than silently defaulted.
#[derive(Debug, Clone, Default)]
pub struct DenyDetails {
    pub status_code: Option<StatusCode>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub error_description: Option<String>,
}

/// Mutable state for one in-flight authorization decision.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub matched_api: Arc<ApiConfig>,
    pub matched_resource: Arc<ResourceConfig>,
    pub authentication_context: Option<AuthenticationContext>,
    pub deny: DenyDetails,
    pub headers_to_add: HashMap<String, String>,
    pub headers_to_remove: HashSet<String>,
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(matched_api: Arc<ApiConfig>, matched_resource: Arc<ResourceConfig>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            matched_api,
            matched_resource,
            authentication_context: None,
            deny: DenyDetails::default(),
            headers_to_add: HashMap::new(),
            headers_to_remove: HashSet::new(),
            metadata: HashMap::new(),
        }
    }

    /// The request's authentication context, or an unauthenticated default
    /// when no auth stage has attached one (e.g. after an early denial).
    pub fn authentication(&self) -> AuthenticationContext {
        self.authentication_context.clone().unwrap_or_default()
    }

    /// Record a denial with full error details.
    pub fn deny_with_error(
        &mut self,
        status_code: StatusCode,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
        error_description: impl Into<String>,
    ) {
        self.deny = DenyDetails {
            status_code: Some(status_code),
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
            error_description: Some(error_description.into()),
        };
    }
}

//! Per-API pipeline front: owns the configuration and filter chain, and
//! turns each chain walk into a response directive.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use http::StatusCode;
use tracing::error;

use crate::analytics::AnalyticsHook;
use crate::config::EnforcerConfig;
use crate::filters::{FilterChain, FilterRegistry, RateLimiter};
use crate::model::{ApiConfig, RequestContext};
use crate::security::KeyValidator;
use crate::subscription::SubscriptionDataHolder;

use super::descriptor::ApiDescriptor;

/// The decision handed back to the transport layer: either pass the request
/// through with header mutations, or answer the client directly.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ResponseObject {
    pub request_id: String,
    pub status_code: u16,
    pub direct_response: bool,
    pub headers_to_add: HashMap<String, String>,
    pub headers_to_remove: HashSet<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub error_description: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

/// One deployed REST API: immutable configuration plus its filter chain.
///
/// Safe to share across concurrent requests; `process` only mutates the
/// per-request context it is handed.
pub struct RestApi {
    config: Arc<ApiConfig>,
    chain: FilterChain,
    settings: Arc<EnforcerConfig>,
    analytics: Arc<dyn AnalyticsHook>,
}

impl RestApi {
    pub fn new(
        descriptor: &ApiDescriptor,
        settings: Arc<EnforcerConfig>,
        registry: &FilterRegistry,
        subscriptions: Arc<SubscriptionDataHolder>,
        limiter: Arc<dyn RateLimiter>,
        analytics: Arc<dyn AnalyticsHook>,
    ) -> Self {
        let config = Arc::new(super::build_api_config(descriptor));
        let chain = FilterChain::assemble(
            &config,
            &settings,
            registry,
            KeyValidator::new(subscriptions),
            limiter,
        );
        Self { config, chain, settings, analytics }
    }

    pub fn config(&self) -> &Arc<ApiConfig> {
        &self.config
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.chain.stage_names()
    }

    /// Run the filter chain for one request and assemble the response
    /// directive.
    pub fn process(&self, mut context: RequestContext) -> ResponseObject {
        let analytics_enabled = self.settings.analytics.enabled;

        // Strip the inbound credential from the outbound request exactly
        // once, before any stage runs.
        if !self.settings.auth_header.enable_outbound_auth_header {
            let header =
                self.config.auth_header_name(&self.settings.auth_header.authorization_header);
            context.headers_to_remove.insert(header.to_string());
        }

        if self.chain.execute(&mut context) {
            let mut response = ResponseObject {
                request_id: context.request_id.clone(),
                status_code: StatusCode::OK.as_u16(),
                direct_response: false,
                headers_to_remove: context.headers_to_remove.clone(),
                ..Default::default()
            };
            if !context.headers_to_add.is_empty() {
                response.headers_to_add = context.headers_to_add.clone();
            }
            if analytics_enabled {
                self.analytics.on_success(&context);
                response.metadata = Some(context.metadata.clone());
            }
            return response;
        }

        let status_code = match context.deny.status_code {
            Some(code) => code.as_u16(),
            None => {
                error!(
                    request_id = context.request_id.as_str(),
                    api = self.config.name.as_str(),
                    "A stage stopped the chain without setting a status code"
                );
                StatusCode::INTERNAL_SERVER_ERROR.as_u16()
            }
        };
        let mut response = ResponseObject {
            request_id: context.request_id.clone(),
            status_code,
            direct_response: true,
            error_code: context.deny.error_code.clone(),
            error_message: context.deny.error_message.clone(),
            error_description: context.deny.error_description.clone(),
            ..Default::default()
        };
        if !context.headers_to_add.is_empty() {
            response.headers_to_add = context.headers_to_add.clone();
        }
        if analytics_enabled
            && !self.settings.analytics.is_skipped_fault_event(response.error_code.as_deref())
        {
            self.analytics.on_failure(&context);
            response.metadata = Some(HashMap::new());
        }
        response
    }
}

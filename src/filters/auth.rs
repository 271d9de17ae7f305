//! Authentication stage.
//!
//! Runs key/subscription validation for the caller's credential and, when
//! that succeeds, scope validation against the matched resource. The
//! credential itself (token parsing, signature verification) is handled by
//! the transport layer, which attaches the parsed [`AuthenticationContext`]
//! before the chain runs.

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, error};

use crate::model::{ApiConfig, AuthenticationContext, RequestContext, ValidationStatus};
use crate::security::{validate_scopes, KeyValidator, TokenValidationContext};

use super::{Filter, FilterOutcome};

const MISSING_CREDENTIALS: (&str, &str) = ("900902", "Missing Credentials");
const INVALID_CREDENTIALS: (&str, &str) = ("900901", "Invalid Credentials");
const API_BLOCKED: (&str, &str) = ("900907", "The requested API is temporarily blocked");
const SUBSCRIPTION_INACTIVE: (&str, &str) = ("900909", "The subscription to the API is inactive");
const RESOURCE_FORBIDDEN: (&str, &str) = ("900908", "Resource forbidden");
const INVALID_SCOPE: (&str, &str) =
    ("900910", "The access token does not allow you to access the requested resource");
const INTERNAL_FAILURE: (&str, &str) = ("900900", "Unclassified Authentication Failure");

pub struct AuthFilter {
    api: Arc<ApiConfig>,
    key_validator: KeyValidator,
}

impl AuthFilter {
    pub fn new(api: Arc<ApiConfig>, key_validator: KeyValidator) -> Self {
        Self { api, key_validator }
    }

    fn deny(
        context: &mut RequestContext,
        status: StatusCode,
        (code, message): (&str, &str),
        description: &str,
    ) -> FilterOutcome {
        context.deny_with_error(status, code, message, description);
        FilterOutcome::Stop
    }
}

impl Filter for AuthFilter {
    fn name(&self) -> &str {
        "auth"
    }

    fn handle_request(&self, context: &mut RequestContext) -> FilterOutcome {
        if self.api.disable_security || context.matched_resource.disable_security {
            debug!(
                api = self.api.name.as_str(),
                resource = context.matched_resource.path.as_str(),
                "Security is disabled, skipping authentication"
            );
            return FilterOutcome::Continue;
        }

        let Some(mut auth) = context.authentication_context.take() else {
            return Self::deny(
                context,
                StatusCode::UNAUTHORIZED,
                MISSING_CREDENTIALS,
                "Required credentials were not provided",
            );
        };
        if auth.consumer_key.is_empty() {
            context.authentication_context = Some(auth);
            return Self::deny(
                context,
                StatusCode::UNAUTHORIZED,
                MISSING_CREDENTIALS,
                "Required credentials were not provided",
            );
        }

        let mut result = self.key_validator.validate_subscription(
            &self.api.uuid,
            &self.api.base_path,
            &self.api.version,
            &auth.consumer_key,
            &auth.key_manager,
        );

        if !result.authorized {
            let (status, detail) = match result.status {
                ValidationStatus::ApiBlocked => (StatusCode::FORBIDDEN, API_BLOCKED),
                ValidationStatus::SubscriptionInactive => {
                    (StatusCode::FORBIDDEN, SUBSCRIPTION_INACTIVE)
                }
                ValidationStatus::ResourceForbidden => (StatusCode::FORBIDDEN, RESOURCE_FORBIDDEN),
                ValidationStatus::InvalidScope => (StatusCode::FORBIDDEN, INVALID_SCOPE),
                ValidationStatus::InternalServerError => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_FAILURE)
                }
                ValidationStatus::Ok => (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS),
            };
            auth.validation_result = Some(result);
            context.authentication_context = Some(auth);
            return Self::deny(context, status, detail, "Subscription validation failed");
        }

        result.token_scopes = auth.token_scopes.clone();
        let mut validation_context = TokenValidationContext {
            cache_hit: false,
            token: auth.token.clone(),
            matched_resource: Arc::clone(&context.matched_resource),
            validation_result: Some(result),
        };
        let scopes_valid = match validate_scopes(&mut validation_context) {
            Ok(valid) => valid,
            Err(err) => {
                error!(
                    error = %err,
                    api = self.api.name.as_str(),
                    "Scope validation failed unexpectedly"
                );
                context.authentication_context = Some(auth);
                return Self::deny(
                    context,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_FAILURE,
                    "Error while validating token scopes",
                );
            }
        };

        auth.validation_result = validation_context.validation_result;
        if !scopes_valid {
            context.authentication_context = Some(auth);
            return Self::deny(
                context,
                StatusCode::FORBIDDEN,
                INVALID_SCOPE,
                "Token lacks a scope required by the matched resource",
            );
        }

        auth.authenticated = true;
        context.authentication_context = Some(auth);
        FilterOutcome::Continue
    }
}

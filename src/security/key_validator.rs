//! Key/subscription validation: identity -> entitlement -> policy.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::{EnforcerError, Result};
use crate::model::{ValidationResult, ValidationStatus};
use crate::subscription::{
    Api, Application, ApplicationKeyMapping, KeyType, LifecycleState, Subscription,
    SubscriptionDataHolder, SubscriptionState, SubscriptionStore,
};

use super::{split_default_version, tenant_domain_from_context, SUPER_TENANT_DOMAIN};

/// Resolves a consumer key against the tenant's subscription index and
/// applies the blocking cascade.
///
/// The holder is injected so validation runs against fake stores in tests;
/// all lookups are in-memory point reads, never blocking I/O.
#[derive(Clone)]
pub struct KeyValidator {
    holder: Arc<SubscriptionDataHolder>,
}

impl KeyValidator {
    pub fn new(holder: Arc<SubscriptionDataHolder>) -> Self {
        Self { holder }
    }

    /// Validate a subscription for the given API identity and consumer key.
    ///
    /// Always returns a result: entitlement misses come back as structured
    /// unauthorized results, and internal faults are caught here, logged,
    /// and converted to an unauthorized result rather than propagated.
    pub fn validate_subscription(
        &self,
        api_uuid: &str,
        api_context: &str,
        api_version: &str,
        consumer_key: &str,
        key_manager: &str,
    ) -> ValidationResult {
        debug!(
            uuid = api_uuid,
            context = api_context,
            version = api_version,
            consumer_key,
            "Validating subscription"
        );
        match self.resolve(api_uuid, api_context, api_version, consumer_key, key_manager) {
            Ok(result) => result,
            Err(err) => {
                error!(
                    error = %err,
                    uuid = api_uuid,
                    context = api_context,
                    consumer_key,
                    "Error occurred while validating subscription"
                );
                ValidationResult::unauthorized(ValidationStatus::InternalServerError)
            }
        }
    }

    fn resolve(
        &self,
        api_uuid: &str,
        api_context: &str,
        api_version: &str,
        consumer_key: &str,
        key_manager: &str,
    ) -> Result<ValidationResult> {
        let tenant_domain =
            tenant_domain_from_context(api_context).unwrap_or(SUPER_TENANT_DOMAIN);
        let (default_version_invoked, _version) = split_default_version(api_version);

        let mut result =
            ValidationResult { default_version_invoked, ..Default::default() };

        let Some(store) = self.holder.store_for_tenant(tenant_domain) else {
            error!(tenant_domain, "Subscription data store not available for tenant domain");
            result.status = ValidationStatus::ResourceForbidden;
            return Ok(result);
        };

        let Some(api) = store.api_by_context_and_version(api_uuid) else {
            info!(uuid = api_uuid, "API not found in the subscription data store");
            result.status = ValidationStatus::ResourceForbidden;
            return Ok(result);
        };
        let Some(key) = store.key_mapping_by_key_and_key_manager(consumer_key, key_manager) else {
            info!(consumer_key, key_manager, "Application key mapping not found in the data store");
            result.status = ValidationStatus::ResourceForbidden;
            return Ok(result);
        };
        let Some(app) = store.application_by_id(&key.application_uuid) else {
            info!(
                application_uuid = key.application_uuid.as_str(),
                "Application not found in the data store"
            );
            result.status = ValidationStatus::ResourceForbidden;
            return Ok(result);
        };
        let Some(sub) = store.subscription_by_ids(&app.uuid, &api.uuid) else {
            info!(
                application = app.name.as_str(),
                application_uuid = app.uuid.as_str(),
                api = api.name.as_str(),
                api_uuid = api.uuid.as_str(),
                "Valid subscription not found for application and API"
            );
            result.status = ValidationStatus::ResourceForbidden;
            return Ok(result);
        };
        debug!("All entities retrieved from the in-memory data store");

        self.apply(result, store.as_ref(), &api, &key, &app, &sub)
    }

    /// Blocking cascade followed by full result population. The cascade
    /// order is load-bearing: subscription-state checks precede the API
    /// lifecycle check.
    fn apply(
        &self,
        mut result: ValidationResult,
        store: &dyn SubscriptionStore,
        api: &Api,
        key: &ApplicationKeyMapping,
        app: &Application,
        sub: &Subscription,
    ) -> Result<ValidationResult> {
        match sub.state {
            SubscriptionState::Blocked => {
                result.status = ValidationStatus::ApiBlocked;
                return Ok(result);
            }
            SubscriptionState::OnHold | SubscriptionState::Rejected => {
                result.status = ValidationStatus::SubscriptionInactive;
                return Ok(result);
            }
            SubscriptionState::ProdOnlyBlocked if key.key_type != KeyType::Sandbox => {
                result.status = ValidationStatus::ApiBlocked;
                result.key_type = Some(key.key_type);
                return Ok(result);
            }
            _ => {}
        }
        if api.lifecycle_state == LifecycleState::Blocked {
            result.status = ValidationStatus::ApiBlocked;
            return Ok(result);
        }

        let app_policy = store.application_policy_by_name(&app.policy).ok_or_else(|| {
            EnforcerError::internal(format!("Application policy '{}' not found", app.policy))
        })?;
        let sub_policy = store.subscription_policy_by_name(&sub.policy_id).ok_or_else(|| {
            EnforcerError::internal(format!("Subscription policy '{}' not found", sub.policy_id))
        })?;
        let api_policy = store.api_policy_by_name(&api.api_tier);

        result.tier = sub.policy_id.clone();
        result.subscriber = app.subscriber.clone();
        result.application_uuid = app.uuid.clone();
        result.application_name = app.name.clone();
        result.application_tier = app.policy.clone();
        result.app_attributes = app.attributes.clone();
        result.subscriber_tenant_domain = app.tenant_domain.clone();
        result.api_uuid = api.uuid.clone();
        result.api_name = api.name.clone();
        result.api_version = api.version.clone();
        result.api_publisher = api.provider.clone();
        result.key_type = Some(key.key_type);

        result.content_aware = app_policy.content_aware
            || sub_policy.content_aware
            || api_policy.map(|p| p.content_aware).unwrap_or(false);

        if sub_policy.rate_limit_count > 0 {
            result.spike_arrest_limit = sub_policy.rate_limit_count;
        }
        result.spike_arrest_unit = sub_policy.rate_limit_time_unit.clone();
        result.stop_on_quota_reach = sub_policy.stop_on_quota_reach;
        if sub_policy.graphql_max_depth > 0 {
            result.graphql_max_depth = sub_policy.graphql_max_depth;
        }
        if sub_policy.graphql_max_complexity > 0 {
            result.graphql_max_complexity = sub_policy.graphql_max_complexity;
        }
        if !api.api_tier.trim().is_empty() {
            result.api_tier = api.api_tier.clone();
        }
        result.throttling_data_list = vec!["api_level_throttling_key".to_string()];

        result.authorized = true;
        result.status = ValidationStatus::Ok;
        Ok(result)
    }
}

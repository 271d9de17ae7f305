//! In-memory subscription store backed by `DashMap` tables.
//!
//! Each entity kind lives in its own keyed table, so a point lookup during a
//! concurrent insert sees either the previous entity or the new one, never a
//! torn value. Population (event ingestion, REST bootstrap) is driven by the
//! embedding service through the `insert_*` methods.

use dashmap::DashMap;

use super::{
    Api, ApiPolicy, Application, ApplicationKeyMapping, ApplicationPolicy, Subscription,
    SubscriptionPolicy, SubscriptionStore,
};

#[derive(Default)]
pub struct InMemorySubscriptionStore {
    apis: DashMap<String, Api>,
    key_mappings: DashMap<(String, String), ApplicationKeyMapping>,
    applications: DashMap<String, Application>,
    subscriptions: DashMap<(String, String), Subscription>,
    application_policies: DashMap<String, ApplicationPolicy>,
    subscription_policies: DashMap<String, SubscriptionPolicy>,
    api_policies: DashMap<String, ApiPolicy>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_api(&self, api: Api) {
        self.apis.insert(api.uuid.clone(), api);
    }

    pub fn insert_key_mapping(&self, mapping: ApplicationKeyMapping) {
        self.key_mappings
            .insert((mapping.consumer_key.clone(), mapping.key_manager.clone()), mapping);
    }

    pub fn insert_application(&self, application: Application) {
        self.applications.insert(application.uuid.clone(), application);
    }

    pub fn insert_subscription(&self, subscription: Subscription) {
        self.subscriptions.insert(
            (subscription.application_uuid.clone(), subscription.api_uuid.clone()),
            subscription,
        );
    }

    pub fn insert_application_policy(&self, policy: ApplicationPolicy) {
        self.application_policies.insert(policy.name.clone(), policy);
    }

    pub fn insert_subscription_policy(&self, policy: SubscriptionPolicy) {
        self.subscription_policies.insert(policy.name.clone(), policy);
    }

    pub fn insert_api_policy(&self, policy: ApiPolicy) {
        self.api_policies.insert(policy.name.clone(), policy);
    }

    pub fn remove_subscription(&self, application_uuid: &str, api_uuid: &str) {
        self.subscriptions.remove(&(application_uuid.to_string(), api_uuid.to_string()));
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn api_by_context_and_version(&self, uuid: &str) -> Option<Api> {
        self.apis.get(uuid).map(|entry| entry.value().clone())
    }

    fn key_mapping_by_key_and_key_manager(
        &self,
        consumer_key: &str,
        key_manager: &str,
    ) -> Option<ApplicationKeyMapping> {
        self.key_mappings
            .get(&(consumer_key.to_string(), key_manager.to_string()))
            .map(|entry| entry.value().clone())
    }

    fn application_by_id(&self, uuid: &str) -> Option<Application> {
        self.applications.get(uuid).map(|entry| entry.value().clone())
    }

    fn subscription_by_ids(&self, application_uuid: &str, api_uuid: &str) -> Option<Subscription> {
        self.subscriptions
            .get(&(application_uuid.to_string(), api_uuid.to_string()))
            .map(|entry| entry.value().clone())
    }

    fn application_policy_by_name(&self, name: &str) -> Option<ApplicationPolicy> {
        self.application_policies.get(name).map(|entry| entry.value().clone())
    }

    fn subscription_policy_by_name(&self, name: &str) -> Option<SubscriptionPolicy> {
        self.subscription_policies.get(name).map(|entry| entry.value().clone())
    }

    fn api_policy_by_name(&self, name: &str) -> Option<ApiPolicy> {
        self.api_policies.get(name).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{KeyType, LifecycleState, SubscriptionState};

    #[test]
    fn lookups_return_inserted_entities() {
        let store = InMemorySubscriptionStore::new();

        store.insert_api(Api {
            uuid: "api-1".into(),
            name: "PetStore".into(),
            version: "1.0.0".into(),
            context: "/petstore/1.0.0".into(),
            provider: "admin".into(),
            api_tier: String::new(),
            lifecycle_state: LifecycleState::Published,
        });
        store.insert_key_mapping(ApplicationKeyMapping {
            consumer_key: "key-1".into(),
            key_manager: "Resident".into(),
            application_uuid: "app-1".into(),
            key_type: KeyType::Production,
        });
        store.insert_subscription(Subscription {
            application_uuid: "app-1".into(),
            api_uuid: "api-1".into(),
            state: SubscriptionState::Active,
            policy_id: "Gold".into(),
        });

        assert_eq!(store.api_by_context_and_version("api-1").unwrap().name, "PetStore");
        assert_eq!(
            store.key_mapping_by_key_and_key_manager("key-1", "Resident").unwrap().application_uuid,
            "app-1"
        );
        assert!(store.key_mapping_by_key_and_key_manager("key-1", "Other").is_none());
        assert_eq!(
            store.subscription_by_ids("app-1", "api-1").unwrap().state,
            SubscriptionState::Active
        );
        assert!(store.subscription_by_ids("app-1", "api-2").is_none());
    }

    #[test]
    fn reinsert_replaces_entity() {
        let store = InMemorySubscriptionStore::new();
        store.insert_subscription_policy(SubscriptionPolicy {
            name: "Gold".into(),
            content_aware: false,
            rate_limit_count: 0,
            rate_limit_time_unit: None,
            stop_on_quota_reach: false,
            graphql_max_depth: 0,
            graphql_max_complexity: 0,
        });
        store.insert_subscription_policy(SubscriptionPolicy {
            name: "Gold".into(),
            content_aware: true,
            rate_limit_count: 100,
            rate_limit_time_unit: Some("min".into()),
            stop_on_quota_reach: true,
            graphql_max_depth: 5,
            graphql_max_complexity: 50,
        });

        let policy = store.subscription_policy_by_name("Gold").unwrap();
        assert!(policy.content_aware);
        assert_eq!(policy.rate_limit_count, 100);
    }
}

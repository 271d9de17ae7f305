//! End-to-end authorization scenarios: JSON descriptor in, response
//! directive out, against a seeded in-memory subscription index.

use std::collections::HashMap;
use std::sync::Arc;

use vigil::analytics::NoopAnalytics;
use vigil::api::{ApiDescriptor, RestApi};
use vigil::config::EnforcerConfig;
use vigil::filters::{FilterRegistry, NoopRateLimiter};
use vigil::model::{AuthenticationContext, HttpMethod, RequestContext};
use vigil::subscription::{
    Api, Application, ApplicationKeyMapping, ApplicationPolicy, InMemorySubscriptionStore,
    KeyType, LifecycleState, Subscription, SubscriptionDataHolder, SubscriptionPolicy,
    SubscriptionState,
};

fn descriptor() -> ApiDescriptor {
    serde_json::from_value(serde_json::json!({
        "id": "api-1",
        "title": "PetStore",
        "version": "1.0.0",
        "base_path": "/petstore/1.0.0",
        "lifecycle_state": "PUBLISHED",
        "security_schemes": [
            { "definition_name": "oauth2", "scheme_type": "oauth2", "name": "authorization", "location": "header" },
            { "definition_name": "api_key", "scheme_type": "apiKey", "name": "x-api-key", "location": "header" }
        ],
        "resources": [
            {
                "path": "/pets",
                "operations": [
                    {
                        "method": "GET",
                        "security": [
                            { "oauth2": ["read"], "api_key": [] }
                        ]
                    }
                ]
            }
        ]
    }))
    .unwrap()
}

fn seeded_holder() -> Arc<SubscriptionDataHolder> {
    let store = Arc::new(InMemorySubscriptionStore::new());
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
    store.insert_application(Application {
        uuid: "app-1".into(),
        name: "DefaultApplication".into(),
        subscriber: "alice".into(),
        policy: "AppGold".into(),
        tenant_domain: "carbon.super".into(),
        attributes: HashMap::new(),
    });
    store.insert_subscription(Subscription {
        application_uuid: "app-1".into(),
        api_uuid: "api-1".into(),
        state: SubscriptionState::Active,
        policy_id: "Gold".into(),
    });
    store.insert_application_policy(ApplicationPolicy {
        name: "AppGold".into(),
        content_aware: false,
    });
    store.insert_subscription_policy(SubscriptionPolicy {
        name: "Gold".into(),
        content_aware: false,
        rate_limit_count: 0,
        rate_limit_time_unit: None,
        stop_on_quota_reach: false,
        graphql_max_depth: 0,
        graphql_max_complexity: 0,
    });

    let holder = SubscriptionDataHolder::new();
    holder.register_store("carbon.super", store);
    Arc::new(holder)
}

fn rest_api(holder: Arc<SubscriptionDataHolder>) -> RestApi {
    RestApi::new(
        &descriptor(),
        Arc::new(EnforcerConfig::default()),
        &FilterRegistry::new(),
        holder,
        Arc::new(NoopRateLimiter),
        Arc::new(NoopAnalytics),
    )
}

fn context_with_scopes(api: &RestApi, consumer_key: &str, scopes: &[&str]) -> RequestContext {
    let resource = api.config().find_resource("/pets", HttpMethod::Get).unwrap().clone();
    let mut ctx = RequestContext::new(Arc::clone(api.config()), Arc::new(resource));
    ctx.authentication_context = Some(AuthenticationContext {
        authenticated: false,
        consumer_key: consumer_key.into(),
        key_manager: "Resident".into(),
        token: "token-1".into(),
        token_scopes: scopes.iter().map(|s| s.to_string()).collect(),
        validation_result: None,
    });
    ctx
}

#[test]
fn subscribed_caller_with_required_scope_passes_through() {
    let api = rest_api(seeded_holder());
    let response = api.process(context_with_scopes(&api, "key-1", &["read"]));

    assert!(!response.direct_response);
    assert_eq!(response.status_code, 200);
    assert!(response.headers_to_remove.contains("authorization"));
}

#[test]
fn scopeless_token_satisfies_the_unconstrained_scheme() {
    let api = rest_api(seeded_holder());
    let response = api.process(context_with_scopes(&api, "key-1", &[]));

    assert!(!response.direct_response);
    assert_eq!(response.status_code, 200);
}

#[test]
fn token_with_only_unrequired_scopes_is_denied() {
    let api = rest_api(seeded_holder());
    let response = api.process(context_with_scopes(&api, "key-1", &["write"]));

    assert!(response.direct_response);
    assert_eq!(response.status_code, 403);
    assert_eq!(response.error_code.as_deref(), Some("900910"));
}

#[test]
fn unknown_consumer_key_is_denied_as_forbidden() {
    let api = rest_api(seeded_holder());
    let response = api.process(context_with_scopes(&api, "ghost-key", &["read"]));

    assert!(response.direct_response);
    assert_eq!(response.status_code, 403);
    assert_eq!(response.error_code.as_deref(), Some("900908"));
}

#[test]
fn missing_authentication_context_is_denied_as_missing_credentials() {
    let api = rest_api(seeded_holder());
    let resource = api.config().find_resource("/pets", HttpMethod::Get).unwrap().clone();
    let ctx = RequestContext::new(Arc::clone(api.config()), Arc::new(resource));
    let response = api.process(ctx);

    assert!(response.direct_response);
    assert_eq!(response.status_code, 401);
    assert_eq!(response.error_code.as_deref(), Some("900902"));
}

#[test]
fn blocked_subscription_is_denied_as_api_blocked() {
    let store = Arc::new(InMemorySubscriptionStore::new());
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
    store.insert_application(Application {
        uuid: "app-1".into(),
        name: "DefaultApplication".into(),
        subscriber: "alice".into(),
        policy: "AppGold".into(),
        tenant_domain: "carbon.super".into(),
        attributes: HashMap::new(),
    });
    store.insert_subscription(Subscription {
        application_uuid: "app-1".into(),
        api_uuid: "api-1".into(),
        state: SubscriptionState::Blocked,
        policy_id: "Gold".into(),
    });
    let holder = SubscriptionDataHolder::new();
    holder.register_store("carbon.super", store);

    let api = rest_api(Arc::new(holder));
    let response = api.process(context_with_scopes(&api, "key-1", &["read"]));

    assert!(response.direct_response);
    assert_eq!(response.status_code, 403);
    assert_eq!(response.error_code.as_deref(), Some("900907"));
}

#[test]
fn tenant_prefixed_context_resolves_against_the_tenant_store() {
    let mut tenant_descriptor = descriptor();
    tenant_descriptor.base_path = "/t/acme.com/petstore/1.0.0".into();

    let store = Arc::new(InMemorySubscriptionStore::new());
    store.insert_api(Api {
        uuid: "api-1".into(),
        name: "PetStore".into(),
        version: "1.0.0".into(),
        context: "/t/acme.com/petstore/1.0.0".into(),
        provider: "admin@acme.com".into(),
        api_tier: String::new(),
        lifecycle_state: LifecycleState::Published,
    });
    store.insert_key_mapping(ApplicationKeyMapping {
        consumer_key: "key-1".into(),
        key_manager: "Resident".into(),
        application_uuid: "app-1".into(),
        key_type: KeyType::Production,
    });
    store.insert_application(Application {
        uuid: "app-1".into(),
        name: "AcmeApp".into(),
        subscriber: "bob".into(),
        policy: "AppGold".into(),
        tenant_domain: "acme.com".into(),
        attributes: HashMap::new(),
    });
    store.insert_subscription(Subscription {
        application_uuid: "app-1".into(),
        api_uuid: "api-1".into(),
        state: SubscriptionState::Active,
        policy_id: "Gold".into(),
    });
    store.insert_application_policy(ApplicationPolicy {
        name: "AppGold".into(),
        content_aware: false,
    });
    store.insert_subscription_policy(SubscriptionPolicy {
        name: "Gold".into(),
        content_aware: false,
        rate_limit_count: 0,
        rate_limit_time_unit: None,
        stop_on_quota_reach: false,
        graphql_max_depth: 0,
        graphql_max_complexity: 0,
    });
    // only the tenant store is registered; a super-tenant fallback would miss
    let holder = SubscriptionDataHolder::new();
    holder.register_store("acme.com", store);

    let api = RestApi::new(
        &tenant_descriptor,
        Arc::new(EnforcerConfig::default()),
        &FilterRegistry::new(),
        Arc::new(holder),
        Arc::new(NoopRateLimiter),
        Arc::new(NoopAnalytics),
    );
    let response = api.process(context_with_scopes(&api, "key-1", &["read"]));

    assert!(!response.direct_response);
    assert_eq!(response.status_code, 200);
}

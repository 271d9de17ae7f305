//! # Filter Chain Pipeline
//!
//! Ordered, short-circuiting decision stages executed per request.
//!
//! The chain is assembled once per API: the auth stage first, the throttle
//! stage second, custom stages inserted at their declared 1-based positions,
//! and the CORS stage forced to index 0. Ordering is fixed for the lifetime
//! of the API configuration.

mod auth;
mod chain;
mod cors;
mod throttle;

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{ApiConfig, RequestContext};

pub use auth::AuthFilter;
pub use chain::FilterChain;
pub use cors::CorsFilter;
pub use throttle::{NoopRateLimiter, RateLimiter, ThrottleFilter};

/// What a stage decided about the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Hand the request to the next stage
    Continue,
    /// End the walk; the context carries the denial details
    Stop,
}

/// A decision stage in the chain.
///
/// Stages are constructed against an immutable [`ApiConfig`] and must be
/// fast and non-blocking: they run on the synchronous decision path of every
/// request and are never retried.
pub trait Filter: Send + Sync {
    fn name(&self) -> &str;
    fn handle_request(&self, context: &mut RequestContext) -> FilterOutcome;
}

/// Factory producing a custom stage instance for one API.
pub type FilterFactory = Box<dyn Fn(&Arc<ApiConfig>) -> Box<dyn Filter> + Send + Sync>;

/// Registry of custom filter stages, keyed by the name configuration refers
/// to them with. Populated at startup by the embedding service; the chain
/// only consumes the lookup.
#[derive(Default)]
pub struct FilterRegistry {
    factories: HashMap<String, FilterFactory>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: FilterFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn get(&self, name: &str) -> Option<&FilterFactory> {
        self.factories.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApiConfig;

    struct NamedFilter(&'static str);

    impl Filter for NamedFilter {
        fn name(&self) -> &str {
            self.0
        }

        fn handle_request(&self, _context: &mut RequestContext) -> FilterOutcome {
            FilterOutcome::Continue
        }
    }

    #[test]
    fn registry_resolves_registered_factories() {
        let mut registry = FilterRegistry::new();
        registry.register("audit", Box::new(|_config| Box::new(NamedFilter("audit"))));

        let config = Arc::new(ApiConfig::default());
        let filter = registry.get("audit").unwrap()(&config);
        assert_eq!(filter.name(), "audit");
        assert!(registry.get("missing").is_none());
    }
}

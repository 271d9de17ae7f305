//! Chain assembly and execution.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::EnforcerConfig;
use crate::model::{ApiConfig, RequestContext};
use crate::security::KeyValidator;

use super::{
    AuthFilter, CorsFilter, Filter, FilterOutcome, FilterRegistry, RateLimiter, ThrottleFilter,
};

/// The ordered decision stages for one API.
///
/// Assembled once per API configuration and never reordered afterwards, so
/// concurrent requests observe the same deterministic stage sequence.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Build the chain: auth, throttle, declared custom stages at their
    /// 1-based positions (ascending), and CORS forced to the front.
    pub fn assemble(
        config: &Arc<ApiConfig>,
        settings: &EnforcerConfig,
        registry: &FilterRegistry,
        key_validator: KeyValidator,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        let mut filters: Vec<Box<dyn Filter>> = Vec::new();

        filters.push(Box::new(AuthFilter::new(Arc::clone(config), key_validator)));
        filters.push(Box::new(ThrottleFilter::new(limiter)));

        // Sort ascending so each insertion lands where the declaration
        // intended even when the input ordering is arbitrary.
        let mut declared = settings.custom_filters.clone();
        declared.sort_by_key(|filter| filter.position);

        for declaration in &declared {
            let Some(factory) = registry.get(&declaration.name) else {
                error!(
                    filter = declaration.name.as_str(),
                    "No filter implementation registered under the provided name"
                );
                continue;
            };
            if declaration.position <= 0 || declaration.position as usize > filters.len() {
                error!(
                    filter = declaration.name.as_str(),
                    position = declaration.position,
                    chain_length = filters.len(),
                    "Position provided for the filter is invalid"
                );
                continue;
            }
            // Positions are 1-based.
            filters.insert(declaration.position as usize - 1, factory(config));
        }

        // CORS runs first and is not customizable.
        filters.insert(0, Box::new(CorsFilter::new()));

        Self { filters }
    }

    /// Walk the chain in order. Returns true when every stage continued;
    /// the first stage that stops ends the walk immediately.
    pub fn execute(&self, context: &mut RequestContext) -> bool {
        for filter in &self.filters {
            if filter.handle_request(context) == FilterOutcome::Stop {
                debug!(
                    request_id = context.request_id.as_str(),
                    stage = filter.name(),
                    "Filter chain stopped"
                );
                return false;
            }
        }
        true
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }
}

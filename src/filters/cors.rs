//! CORS stage. Always the first stage in every chain and not customizable.
//!
//! Header semantics (origin matching, preflight responses) are handled by
//! the proxy layer in front of the enforcer; this stage exists so the chain
//! position is reserved and future in-enforcer CORS decisions slot in
//! without reordering.

use tracing::trace;

use crate::model::RequestContext;

use super::{Filter, FilterOutcome};

#[derive(Debug, Default)]
pub struct CorsFilter;

impl CorsFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Filter for CorsFilter {
    fn name(&self) -> &str {
        "cors"
    }

    fn handle_request(&self, context: &mut RequestContext) -> FilterOutcome {
        trace!(request_id = context.request_id.as_str(), "CORS stage passed through");
        FilterOutcome::Continue
    }
}

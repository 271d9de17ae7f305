//! Throttle stage: the chain's rate-limit trigger point.
//!
//! The actual rate-limit bookkeeping lives behind the [`RateLimiter`] seam;
//! the default implementation admits everything, and deployments wire in
//! their counting engine at startup.

use http::StatusCode;
use tracing::debug;

use crate::model::RequestContext;

use super::{Filter, FilterOutcome};

const THROTTLED_OUT_ERROR_CODE: &str = "900800";

/// Rate-limit decision seam consulted by the throttle stage. Must not block.
pub trait RateLimiter: Send + Sync {
    /// Whether the request is within its limits.
    fn allow(&self, context: &RequestContext) -> bool;
}

/// Admits every request.
#[derive(Debug, Default)]
pub struct NoopRateLimiter;

impl RateLimiter for NoopRateLimiter {
    fn allow(&self, _context: &RequestContext) -> bool {
        true
    }
}

pub struct ThrottleFilter {
    limiter: std::sync::Arc<dyn RateLimiter>,
}

impl ThrottleFilter {
    pub fn new(limiter: std::sync::Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl Filter for ThrottleFilter {
    fn name(&self) -> &str {
        "throttle"
    }

    fn handle_request(&self, context: &mut RequestContext) -> FilterOutcome {
        if self.limiter.allow(context) {
            return FilterOutcome::Continue;
        }

        debug!(request_id = context.request_id.as_str(), "Request throttled out");
        context.deny_with_error(
            StatusCode::TOO_MANY_REQUESTS,
            THROTTLED_OUT_ERROR_CODE,
            "Message throttled out",
            "You have exceeded your quota",
        );
        FilterOutcome::Stop
    }
}

//! # Analytics Hooks
//!
//! Fire-and-forget observation points invoked after the chain walk. Event
//! transport and formats live with the embedding service; the pipeline only
//! calls the hook and must never be aborted by it.

use crate::model::RequestContext;

/// Observer of request outcomes. Implementations must be fast and must
/// swallow their own errors; the pipeline does not inspect hook results.
pub trait AnalyticsHook: Send + Sync {
    fn on_success(&self, context: &RequestContext);
    fn on_failure(&self, context: &RequestContext);
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NoopAnalytics;

impl AnalyticsHook for NoopAnalytics {
    fn on_success(&self, _context: &RequestContext) {}

    fn on_failure(&self, _context: &RequestContext) {}
}

//! Rate limiting middleware using tower-governor

use std::sync::Arc;

use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::config::RateLimitConfig;

/// Replenish interval and burst size for `requests_per_minute`
///
/// 100 requests per minute replenish one request every 600ms with bursts of
/// up to 100.
pub fn quota(config: &RateLimitConfig) -> (u64, u32) {
    let per_minute = config.requests_per_minute.max(1);
    let replenish_ms = (60_000 / per_minute).max(1);
    let burst = u32::try_from(per_minute).unwrap_or(u32::MAX);
    (replenish_ms, burst)
}

/// Rate limit `router` per peer address
///
/// Needs the server to run with connect info; disabled routers are returned
/// unchanged.
pub fn apply<S>(router: Router<S>, config: &RateLimitConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.enabled {
        return router;
    }
    let (replenish_ms, burst) = quota(config);
    let Some(governor) = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms)
        .burst_size(burst)
        .finish()
    else {
        tracing::warn!(replenish_ms, burst, "Invalid rate limit quota, rate limiting disabled");
        return router;
    };
    tracing::debug!(replenish_ms, burst, "Rate limiting enabled");
    router.layer(GovernorLayer {
        config: Arc::new(governor),
    })
}

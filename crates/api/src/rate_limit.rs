//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-IP rate limiting via tower_governor, with separate budgets for the
//! prediction endpoints and the read-only monitoring endpoints.
//! Uses the Generic Cell Rate Algorithm (GCRA) so no background sweeper is
//! needed.

use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with X-RateLimit-* response headers enabled
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Seconds per replenished request
    pub per_second: u64,
    /// Burst size (max requests served immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Inference is cheap but each call is logged; keep bursts modest
        Self {
            per_second: 1,
            burst_size: 10,
        }
    }
}

impl RateLimitConfig {
    /// Lenient config for read-only endpoints
    pub fn lenient() -> Self {
        Self {
            per_second: 1,
            burst_size: 30,
        }
    }
}

/// Governor configs for the two route groups: prediction endpoints get the
/// modest default budget, read-only monitoring endpoints the lenient one so
/// dashboards polling health are never starved by prediction traffic.
pub struct RateLimits {
    pub predict: Arc<DefaultGovernorConfig>,
    pub read: Arc<DefaultGovernorConfig>,
}

impl RateLimits {
    /// Standard per-group budgets
    pub fn standard() -> Self {
        Self {
            predict: create_governor_config(&RateLimitConfig::default()),
            read: create_governor_config(&RateLimitConfig::lenient()),
        }
    }
}

/// Build a governor config for use with `GovernorLayer`.
///
/// Uses `PeerIpKeyExtractor`, so the service must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_governor_config(config: &RateLimitConfig) -> Arc<DefaultGovernorConfig> {
    Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.per_second)
            .burst_size(config.burst_size)
            .use_headers()
            .finish()
            .expect("valid governor configuration"),
    )
}

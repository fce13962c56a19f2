use rust_decimal::Decimal;
use serde::Deserialize;

pub const DEFAULT_MAX_HOPS: usize = 3;
pub const DEFAULT_STALE_THRESHOLD_MS: i64 = 30_000;

/// Tunables for route discovery and warning generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Upper bound on hops per route
    pub max_hops: usize,
    /// Snapshots older than this produce a `stale_data` warning
    pub stale_threshold_ms: i64,
    /// `low_liquidity` fires when the best level is smaller than
    /// `estimated_output * low_liquidity_ratio`
    pub low_liquidity_ratio: Decimal,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            stale_threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
            low_liquidity_ratio: Decimal::new(5, 1),
        }
    }
}

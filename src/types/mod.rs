//! Type definitions for the commerce core

use std::time::Duration;

/// Configuration for the commerce core services
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Default currency for carts, totals, and revenue sums
    pub currency:             String,
    /// Cadence of the payment reconciliation job
    pub reconcile_interval:   Duration,
    /// Cadence of the stale-order cancellation sweep
    pub stale_sweep_interval: Duration,
    /// Age past which an unpaid pending order is cancelled
    pub stale_order_age:      Duration,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            currency:             "USD".to_string(),
            reconcile_interval:   Duration::from_secs(15 * 60),
            stale_sweep_interval: Duration::from_secs(24 * 60 * 60),
            stale_order_age:      Duration::from_secs(24 * 60 * 60),
        }
    }
}

pub mod catalog;

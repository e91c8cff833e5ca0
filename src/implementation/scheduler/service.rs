//! Order scheduler service

use chrono::{Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    implementation::order_engine::{OrderEngine, OrderFilter, OrderStatus, PaymentStatus},
    types::CommerceConfig,
};

/// Background order reconciliation.
///
/// Both jobs are plain methods returning the number of orders touched, so
/// they can be driven by tests or external cron as well as by
/// [`spawn`](Self::spawn). A failure on one order is logged and does not
/// abort the rest of the batch.
#[derive(Debug, Clone)]
pub struct OrderScheduler {
    /// Order engine the jobs run against.
    engine: OrderEngine,
    /// Cadences and the stale-order age.
    config: CommerceConfig,
}

impl OrderScheduler {
    /// Creates a scheduler over the given engine.
    #[must_use]
    pub fn new(engine: OrderEngine, config: CommerceConfig) -> Self {
        Self { engine, config }
    }

    /// Moves orders whose payment completed but whose status lags from
    /// `Pending` to `Processing`. Idempotent.
    pub fn reconcile_payments(&self) -> usize {
        let filter = OrderFilter::new()
            .with_status(OrderStatus::Pending)
            .with_payment_status(PaymentStatus::Completed);

        let lagging = match self.engine.orders_matching(&filter) {
            Ok(orders) => orders,
            Err(error) => {
                warn!(%error, "payment reconciliation query failed");
                return 0;
            },
        };

        let mut reconciled = 0;
        for order in lagging {
            match self.engine.update_status(&order.id, OrderStatus::Processing, "scheduler") {
                Ok(_) => reconciled += 1,
                Err(error) => {
                    warn!(order_id = %order.id, %error, "payment reconciliation failed; skipping order");
                },
            }
        }
        reconciled
    }

    /// Cancels orders that sat unpaid in `Pending` past the configured age,
    /// crediting their stock back.
    pub fn cancel_stale_orders(&self) -> usize {
        let age = Duration::from_std(self.config.stale_order_age)
            .unwrap_or_else(|_| Duration::hours(24));
        let cutoff = Utc::now() - age;

        let filter = OrderFilter {
            status:         Some(OrderStatus::Pending),
            payment_status: Some(PaymentStatus::Pending),
            created_from:   None,
            created_to:     Some(cutoff),
        };

        let stale = match self.engine.orders_matching(&filter) {
            Ok(orders) => orders,
            Err(error) => {
                warn!(%error, "stale-order query failed");
                return 0;
            },
        };

        let mut cancelled = 0;
        for order in stale {
            match self.engine.cancel_expired(&order.id) {
                Ok(_) => cancelled += 1,
                Err(error) => {
                    warn!(order_id = %order.id, %error, "stale-order cancellation failed; skipping order");
                },
            }
        }
        cancelled
    }

    /// Spawns both jobs onto the tokio runtime at their configured cadences.
    #[must_use]
    pub fn spawn(self) -> Vec<JoinHandle<()>> {
        let reconciler = self.clone();
        let reconcile_handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(reconciler.config.reconcile_interval);
            loop {
                tick.tick().await;
                let reconciled = reconciler.reconcile_payments();
                if reconciled > 0 {
                    info!(count = reconciled, "reconciled paid orders");
                }
            }
        });

        let sweeper = self;
        let sweep_handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(sweeper.config.stale_sweep_interval);
            loop {
                tick.tick().await;
                let cancelled = sweeper.cancel_stale_orders();
                if cancelled > 0 {
                    info!(count = cancelled, "cancelled stale unpaid orders");
                }
            }
        });

        vec![reconcile_handle, sweep_handle]
    }
}

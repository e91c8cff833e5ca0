//! Implementation of the commerce core services

pub mod cart_system;
pub mod catalog_store;
pub mod order_engine;
pub mod scheduler;
pub mod stock_ledger;
pub mod user_directory;

use crate::types::{catalog::Currency, CommerceConfig};

use cart_system::CartService;
use catalog_store::CatalogStore;
use order_engine::OrderEngine;
use scheduler::OrderScheduler;
use stock_ledger::StockLedger;
use user_directory::UserDirectory;

/// Top-level handle wiring the core services together.
///
/// All services share state through `Arc`s, so the handle is cheap to clone
/// and safe to hand to request workers.
#[derive(Debug, Clone)]
pub struct CommerceCore {
    config: CommerceConfig,
    /// Catalog store boundary.
    pub catalog: CatalogStore,
    /// User directory boundary.
    pub users:   UserDirectory,
    /// Cart engine.
    pub carts:   CartService,
    /// Stock ledger.
    pub ledger:  StockLedger,
    /// Order engine.
    pub orders:  OrderEngine,
}

impl CommerceCore {
    /// Wires the core services from one configuration.
    #[must_use]
    pub fn new(config: CommerceConfig) -> Self {
        let currency = Currency::new(config.currency.clone());
        let catalog = CatalogStore::new();
        let users = UserDirectory::new();
        let carts = CartService::new(catalog.clone(), currency.clone());
        let ledger = StockLedger::new(catalog.clone());
        let orders = OrderEngine::new(
            catalog.clone(),
            ledger.clone(),
            carts.clone(),
            users.clone(),
            currency,
        );

        Self { config, catalog, users, carts, ledger, orders }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CommerceConfig {
        &self.config
    }

    /// Builds the background scheduler over this core's order engine.
    #[must_use]
    pub fn scheduler(&self) -> OrderScheduler {
        OrderScheduler::new(self.orders.clone(), self.config.clone())
    }
}

impl Default for CommerceCore {
    fn default() -> Self {
        Self::new(CommerceConfig::default())
    }
}

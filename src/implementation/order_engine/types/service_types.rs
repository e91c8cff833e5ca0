//! Service types for the order engine.
//!
//! This module contains the OrderEngine service struct plus the filter,
//! pagination, and reporting types backing the admin read API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::{
    implementation::cart_system::{CartService, CustomerId},
    implementation::catalog_store::CatalogStore,
    implementation::stock_ledger::StockLedger,
    implementation::user_directory::UserDirectory,
    types::catalog::{Currency, ProductId},
};

use super::basic_types::{OrderId, OrderStatus, PaymentStatus};
use super::main_order_types::Order;

/// Order engine service.
#[derive(Debug, Clone)]
pub struct OrderEngine {
    /// Orders indexed by ID.
    pub(crate) orders: Arc<Mutex<HashMap<OrderId, Order>>>,
    /// Orders indexed by customer.
    pub(crate) orders_by_customer: Arc<Mutex<HashMap<CustomerId, Vec<OrderId>>>>,
    /// Order number counter.
    pub(crate) order_counter: Arc<Mutex<u64>>,
    /// Catalog read source for snapshots.
    pub(crate) catalog: CatalogStore,
    /// Stock ledger for reservation and release.
    pub(crate) ledger: StockLedger,
    /// Cart service, for from-cart creation.
    pub(crate) carts: CartService,
    /// User directory, for existence checks.
    pub(crate) users: UserDirectory,
    /// Currency for totals.
    pub(crate) currency: Currency,
}

/// Order search filter.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Filter by status.
    pub status: Option<OrderStatus>,
    /// Filter by payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Created at or after.
    pub created_from: Option<DateTime<Utc>>,
    /// Created at or before.
    pub created_to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by status.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by payment status.
    #[must_use]
    pub fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = Some(payment_status);
        self
    }
}

/// Paginated order listing.
#[derive(Debug, Clone)]
pub struct OrderPage {
    /// Orders in this page, newest first.
    pub orders: Vec<Order>,
    /// Total count of matching orders.
    pub total_count: usize,
    /// Current page number (0-indexed).
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Whether there are more pages.
    pub has_next: bool,
}

/// One row of the top-seller report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    /// Product ID.
    pub product_id: ProductId,
    /// Units sold across non-cancelled orders.
    pub quantity_sold: u64,
}

//! Main order types for the order engine.
//!
//! This module contains the Order and OrderItem structs that define the
//! persisted order data model, plus the explicit line input type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    implementation::cart_system::CustomerId,
    implementation::stock_ledger::StockLine,
    types::catalog::{Price, ProductId, Sku},
};

use super::basic_types::{OrderId, OrderItemId, OrderStatus, PaymentStatus};

/// One line of an explicit order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID, when ordering a specific variant.
    pub variant_id: Option<ProductId>,
    /// Quantity.
    pub quantity: u32,
}

impl OrderLine {
    /// Creates a new order line.
    #[must_use]
    pub fn new(product_id: ProductId, variant_id: Option<ProductId>, quantity: u32) -> Self {
        Self { product_id, variant_id, quantity }
    }
}

/// Line item in an order.
///
/// Snapshots name, description, sku, and price at order time so that later
/// catalog edits cannot retroactively change historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Order item ID.
    pub id: OrderItemId,
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID.
    pub variant_id: Option<ProductId>,
    /// Product name at order time.
    pub product_name: String,
    /// Product description at order time.
    pub product_description: String,
    /// SKU at order time.
    pub sku: Sku,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Price,
}

impl OrderItem {
    /// Line total.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.multiply(self.quantity)
    }

    /// The stock line this item debited at creation.
    #[must_use]
    pub fn stock_line(&self) -> StockLine {
        StockLine::new(self.product_id.clone(), self.variant_id.clone(), self.quantity)
    }
}

/// Complete order.
///
/// Orders are never physically deleted; cancellation is a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Order number (display).
    pub order_number: String,
    /// Owning customer ID.
    pub customer_id: CustomerId,
    /// Order status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// Total amount, frozen at creation.
    pub total_amount: Price,
    /// Cancellation reason, when cancelled.
    pub cancellation_reason: Option<String>,
    /// When the order moved to Processing.
    pub processed_at: Option<DateTime<Utc>>,
    /// When the order was shipped.
    pub shipped_at: Option<DateTime<Utc>>,
    /// When the order was delivered.
    pub delivered_at: Option<DateTime<Utc>>,
    /// When the order was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

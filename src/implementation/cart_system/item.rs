//! Cart item type definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::catalog::{Price, ProductId, Sku};

use super::types::CartItemId;

/// Item in the shopping cart.
///
/// `unit_price` is locked when the item is first added; it is never
/// re-derived from catalog state afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart item ID.
    pub id:           CartItemId,
    /// Product ID.
    pub product_id:   ProductId,
    /// Variant ID (if applicable).
    pub variant_id:   Option<ProductId>,
    /// Product name (cached for display).
    pub product_name: String,
    /// SKU (cached).
    pub sku:          Sku,
    /// Quantity.
    pub quantity:     u32,
    /// Unit price at time of adding.
    pub unit_price:   Price,
    /// When item was added.
    pub added_at:     DateTime<Utc>,
    /// When item was last updated.
    pub updated_at:   DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart item.
    #[must_use]
    pub fn new(
        product_id: ProductId, variant_id: Option<ProductId>, product_name: impl Into<String>,
        sku: Sku, quantity: u32, unit_price: Price,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CartItemId::generate(),
            product_id,
            variant_id,
            product_name: product_name.into(),
            sku,
            quantity,
            unit_price,
            added_at: now,
            updated_at: now,
        }
    }

    /// Calculates the line total.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.multiply(self.quantity)
    }

    /// Updates quantity.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.updated_at = Utc::now();
    }
}

//! Shopping cart and totals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::CommerceError,
    types::catalog::{Currency, Price, ProductId},
};

use super::item::CartItem;
use super::types::{CartId, CartItemId, CustomerId};

/// Shopping cart.
///
/// Each user owns at most one cart; `CartService` keys its table by
/// customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id:          CartId,
    /// Owning customer ID.
    pub customer_id: CustomerId,
    /// Items in cart.
    pub items:       Vec<CartItem>,
    /// Creation timestamp.
    pub created_at:  DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at:  DateTime<Utc>,
}

impl Cart {
    /// Creates a new cart.
    #[must_use]
    pub fn new(customer_id: CustomerId) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::generate(),
            customer_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of unique items.
    #[must_use]
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity of all items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Updates the bookkeeping timestamp.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Finds the item matching a (product, variant) pair.
    #[must_use]
    pub fn find_item_mut(
        &mut self, product_id: &ProductId, variant_id: Option<&ProductId>,
    ) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| &i.product_id == product_id && i.variant_id.as_ref() == variant_id)
    }

    /// Finds an item by its ID.
    #[must_use]
    pub fn item_by_id_mut(&mut self, id: &CartItemId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Sums `unit_price x quantity` over all items.
    ///
    /// An empty cart totals zero in the given currency.
    pub fn total(&self, currency: &Currency) -> Result<Price, CommerceError> {
        let mut total = Price::zero(currency.clone());
        for item in &self.items {
            total = total.add(&item.line_total())?;
        }
        Ok(total)
    }

    /// Removes all items in one step.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }
}

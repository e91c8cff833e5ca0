//! Cart management service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    errors::CommerceError,
    implementation::catalog_store::CatalogStore,
    types::catalog::{Currency, Price, ProductId},
};

use super::cart::Cart;
use super::item::CartItem;
use super::types::{CartItemId, CustomerId};

/// Cart management service.
///
/// One active cart per user; the table is keyed by customer, and same-user
/// concurrent calls serialize on the table lock.
#[derive(Debug, Clone)]
pub struct CartService {
    /// Carts indexed by owning customer.
    carts:    Arc<Mutex<HashMap<CustomerId, Cart>>>,
    /// Catalog read source for price locking.
    catalog:  CatalogStore,
    /// Currency for totals.
    currency: Currency,
}

impl CartService {
    /// Creates a new cart service.
    #[must_use]
    pub fn new(catalog: CatalogStore, currency: Currency) -> Self {
        Self { carts: Arc::new(Mutex::new(HashMap::new())), catalog, currency }
    }

    /// Adds an item to the user's cart, locking the unit price.
    ///
    /// A variant id locks the variant's current price; otherwise the
    /// product's own price applies. If a matching (product, variant) row
    /// already exists, its quantity is increased and the previously locked
    /// price is kept unchanged.
    pub fn add_item(
        &self, customer_id: &CustomerId, product_id: &ProductId,
        variant_id: Option<&ProductId>, quantity: u32,
    ) -> Result<CartItem, CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity);
        }

        let product = self.catalog.get_product(product_id)?;
        if !product.status.is_purchasable() {
            return Err(CommerceError::ProductNotAvailable(product_id.to_string()));
        }

        // Resolve the price to lock before touching the cart table.
        let (unit_price, sku) = match variant_id {
            Some(variant_id) => {
                let variant = product
                    .variant(variant_id)
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))?;
                (variant.price.clone(), variant.sku.clone())
            },
            None => {
                let price = product
                    .price
                    .clone()
                    .ok_or_else(|| CommerceError::ProductPriceNotSet(product_id.to_string()))?;
                (price, product.sku.clone())
            },
        };

        let mut carts = self.carts.lock().map_err(|_| CommerceError::LockError)?;
        let cart = carts
            .entry(customer_id.clone())
            .or_insert_with(|| Cart::new(customer_id.clone()));

        if let Some(item) = cart.find_item_mut(product_id, variant_id) {
            let new_qty = item.quantity.saturating_add(quantity);
            item.set_quantity(new_qty);
            let item = item.clone();
            cart.touch();
            return Ok(item);
        }

        let item = CartItem::new(
            product_id.clone(),
            variant_id.cloned(),
            product.name.clone(),
            sku,
            quantity,
            unit_price,
        );
        cart.items.push(item.clone());
        cart.touch();
        Ok(item)
    }

    /// Updates an item's quantity.
    ///
    /// The locked price is never touched.
    pub fn update_item(
        &self, customer_id: &CustomerId, cart_item_id: &CartItemId, quantity: u32,
    ) -> Result<CartItem, CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity);
        }

        let mut carts = self.carts.lock().map_err(|_| CommerceError::LockError)?;
        let cart = carts
            .get_mut(customer_id)
            .ok_or_else(|| CommerceError::CartItemNotOwned(cart_item_id.to_string()))?;
        let item = cart
            .item_by_id_mut(cart_item_id)
            .ok_or_else(|| CommerceError::CartItemNotOwned(cart_item_id.to_string()))?;

        item.set_quantity(quantity);
        let item = item.clone();
        cart.touch();
        Ok(item)
    }

    /// Removes an item from the user's cart. Idempotent.
    pub fn remove_item(
        &self, customer_id: &CustomerId, cart_item_id: &CartItemId,
    ) -> Result<(), CommerceError> {
        let mut carts = self.carts.lock().map_err(|_| CommerceError::LockError)?;
        if let Some(cart) = carts.get_mut(customer_id) {
            let initial_len = cart.items.len();
            cart.items.retain(|i| &i.id != cart_item_id);
            if cart.items.len() != initial_len {
                cart.touch();
            }
        }
        Ok(())
    }

    /// Deletes all items of the user's cart in one step. Idempotent.
    pub fn clear_cart(&self, customer_id: &CustomerId) -> Result<(), CommerceError> {
        let mut carts = self.carts.lock().map_err(|_| CommerceError::LockError)?;
        if let Some(cart) = carts.get_mut(customer_id) {
            cart.clear();
        }
        Ok(())
    }

    /// Gets the user's cart, if one exists.
    pub fn get_cart(&self, customer_id: &CustomerId) -> Result<Option<Cart>, CommerceError> {
        let carts = self.carts.lock().map_err(|_| CommerceError::LockError)?;
        Ok(carts.get(customer_id).cloned())
    }

    /// Sums `unit_price x quantity` over the user's cart.
    ///
    /// A missing or empty cart totals zero rather than failing.
    pub fn get_totals(&self, customer_id: &CustomerId) -> Result<Price, CommerceError> {
        let carts = self.carts.lock().map_err(|_| CommerceError::LockError)?;
        match carts.get(customer_id) {
            Some(cart) => cart.total(&self.currency),
            None => Ok(Price::zero(self.currency.clone())),
        }
    }
}

//! Service implementation.
//!
//! Business logic implementations for the OrderEngine type.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::errors::CommerceError;
use crate::implementation::cart_system::{CartItem, CartService, CustomerId};
use crate::implementation::catalog_store::CatalogStore;
use crate::implementation::stock_ledger::StockLedger;
use crate::implementation::user_directory::UserDirectory;
use crate::types::catalog::{Currency, Price};

use super::super::types::basic_types::{OrderId, OrderItemId, OrderStatus, PaymentStatus};
use super::super::types::main_order_types::{Order, OrderItem, OrderLine};
use super::super::types::service_types::{OrderEngine, OrderFilter, OrderPage, TopProduct};

impl OrderEngine {
    /// Creates a new order engine.
    #[must_use]
    pub fn new(
        catalog: CatalogStore, ledger: StockLedger, carts: CartService, users: UserDirectory,
        currency: Currency,
    ) -> Self {
        Self {
            orders: Arc::new(Mutex::new(HashMap::new())),
            orders_by_customer: Arc::new(Mutex::new(HashMap::new())),
            order_counter: Arc::new(Mutex::new(1000)),
            catalog,
            ledger,
            carts,
            users,
            currency,
        }
    }

    /// Generates the next order number.
    fn next_order_number(&self) -> Result<u64, CommerceError> {
        let mut counter = self.order_counter.lock().map_err(|_| CommerceError::LockError)?;
        let num = *counter;
        *counter += 1;
        Ok(num)
    }

    // ========================================================================
    // ORDER CREATION
    // ========================================================================

    /// Creates an order from the user's cart.
    ///
    /// Snapshots the cart items (name, description, and sku from the catalog;
    /// the price as locked in the cart), reserves stock atomically, persists
    /// the order, and clears the cart. A failure at any step leaves no
    /// partial order, no partial debit, and an untouched cart.
    pub fn create_order_from_cart(
        &self, customer_id: &CustomerId,
    ) -> Result<Order, CommerceError> {
        self.users.get_user(customer_id)?;

        let cart = self.carts.get_cart(customer_id)?;
        let cart_items = match cart {
            Some(cart) if !cart.is_empty() => cart.items,
            _ => return Err(CommerceError::CartEmpty),
        };

        let mut items = Vec::with_capacity(cart_items.len());
        for cart_item in &cart_items {
            items.push(self.snapshot_cart_item(cart_item)?);
        }

        self.commit_order(customer_id, items, true)
    }

    /// Creates an order from an explicit item list.
    ///
    /// Prices are snapshotted from the catalog at order time: the variant's
    /// when a variant is referenced, else the product's own.
    pub fn create_order(
        &self, customer_id: &CustomerId, lines: &[OrderLine],
    ) -> Result<Order, CommerceError> {
        self.users.get_user(customer_id)?;

        if lines.is_empty() {
            return Err(CommerceError::EmptyOrderRequest);
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity == 0 {
                return Err(CommerceError::InvalidQuantity);
            }
            items.push(self.snapshot_line(line)?);
        }

        self.commit_order(customer_id, items, false)
    }

    /// Builds an order item snapshot from a cart item, keeping the locked
    /// unit price.
    fn snapshot_cart_item(&self, cart_item: &CartItem) -> Result<OrderItem, CommerceError> {
        let product = self.catalog.get_product(&cart_item.product_id)?;

        let sku = match &cart_item.variant_id {
            Some(variant_id) => {
                product
                    .variant(variant_id)
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))?
                    .sku
                    .clone()
            },
            None => product.sku.clone(),
        };

        Ok(OrderItem {
            id: OrderItemId::generate(),
            product_id: cart_item.product_id.clone(),
            variant_id: cart_item.variant_id.clone(),
            product_name: product.name,
            product_description: product.description,
            sku,
            quantity: cart_item.quantity,
            price: cart_item.unit_price.clone(),
        })
    }

    /// Builds an order item snapshot from an explicit line at current
    /// catalog prices.
    fn snapshot_line(&self, line: &OrderLine) -> Result<OrderItem, CommerceError> {
        let product = self.catalog.get_product(&line.product_id)?;

        let (price, sku) = match &line.variant_id {
            Some(variant_id) => {
                let variant = product
                    .variant(variant_id)
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))?;
                (variant.price.clone(), variant.sku.clone())
            },
            None => {
                let price = product.price.clone().ok_or_else(|| {
                    CommerceError::ProductPriceNotSet(line.product_id.to_string())
                })?;
                (price, product.sku.clone())
            },
        };

        Ok(OrderItem {
            id: OrderItemId::generate(),
            product_id: line.product_id.clone(),
            variant_id: line.variant_id.clone(),
            product_name: product.name,
            product_description: product.description,
            sku,
            quantity: line.quantity,
            price,
        })
    }

    /// Reserves stock and persists the order; clears the cart for the
    /// from-cart source.
    ///
    /// Reservation is the only fallible step after snapshotting, and it is
    /// atomic in the ledger; the inserts and the one-step cart clear that
    /// follow cannot fail partway.
    fn commit_order(
        &self, customer_id: &CustomerId, items: Vec<OrderItem>, from_cart: bool,
    ) -> Result<Order, CommerceError> {
        let mut total = Price::zero(self.currency.clone());
        for item in &items {
            total = total.add(&item.line_total())?;
        }

        let stock_lines: Vec<_> = items.iter().map(OrderItem::stock_line).collect();
        self.ledger.reserve(&stock_lines)?;

        let order_number = format!("#{}", self.next_order_number()?);
        let order = Order::new(customer_id.clone(), order_number, items, total);

        {
            let mut orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
            let mut by_customer =
                self.orders_by_customer.lock().map_err(|_| CommerceError::LockError)?;
            orders.insert(order.id.clone(), order.clone());
            by_customer.entry(customer_id.clone()).or_default().push(order.id.clone());
        }

        if from_cart {
            self.carts.clear_cart(customer_id)?;
        }

        info!(
            order_id = %order.id,
            customer_id = %customer_id,
            total = %order.total_amount.amount,
            "order created"
        );
        Ok(order)
    }

    // ========================================================================
    // STATUS TRANSITIONS
    // ========================================================================

    /// Moves an order to `new_status`, stamping the matching timestamp.
    ///
    /// Illegal transitions are rejected; everything else about the caller is
    /// trusted (admin surface).
    pub fn update_status(
        &self, order_id: &OrderId, new_status: OrderStatus, actor: &str,
    ) -> Result<Order, CommerceError> {
        let mut orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;

        order.transition_to(new_status)?;
        info!(order_id = %order_id, status = new_status.display_name(), actor, "order status updated");
        Ok(order.clone())
    }

    /// Records the payment outcome for an order.
    pub fn record_payment_result(
        &self, order_id: &OrderId, result: PaymentStatus,
    ) -> Result<Order, CommerceError> {
        let mut orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;

        order.record_payment(result)?;
        info!(order_id = %order_id, payment = result.display_name(), "payment result recorded");
        Ok(order.clone())
    }

    /// Cancels an order on behalf of its owner, crediting back exactly the
    /// quantities debited at creation.
    pub fn cancel_order(
        &self, order_id: &OrderId, reason: impl Into<String>, customer_id: &CustomerId,
    ) -> Result<Order, CommerceError> {
        let (cancelled, stock_lines) = {
            let mut orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
            let order = orders
                .get_mut(order_id)
                .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;

            if &order.customer_id != customer_id {
                return Err(CommerceError::OrderAccessDenied(order_id.to_string()));
            }
            if !order.can_cancel() {
                return Err(CommerceError::OrderNotCancellable(order_id.to_string()));
            }

            order.record_cancellation(reason)?;
            (order.clone(), order.stock_lines())
        };

        self.ledger.release(&stock_lines)?;
        info!(order_id = %order_id, customer_id = %customer_id, "order cancelled");
        Ok(cancelled)
    }

    /// Cancels an unpaid pending order on behalf of the system.
    ///
    /// Used by the stale-order sweep; credits stock back like a
    /// user-initiated cancellation.
    pub(crate) fn cancel_expired(&self, order_id: &OrderId) -> Result<Order, CommerceError> {
        let (cancelled, stock_lines) = {
            let mut orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
            let order = orders
                .get_mut(order_id)
                .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;

            if order.status != OrderStatus::Pending
                || order.payment_status != PaymentStatus::Pending
            {
                return Err(CommerceError::OrderNotCancellable(order_id.to_string()));
            }

            order.record_cancellation("payment timeout")?;
            (order.clone(), order.stock_lines())
        };

        self.ledger.release(&stock_lines)?;
        info!(order_id = %order_id, "stale order cancelled");
        Ok(cancelled)
    }

    // ========================================================================
    // READ PATHS
    // ========================================================================

    /// Gets an order, checking ownership.
    pub fn get_order(
        &self, order_id: &OrderId, customer_id: &CustomerId,
    ) -> Result<Order, CommerceError> {
        let orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
        let order = orders
            .get(order_id)
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;

        if &order.customer_id != customer_id {
            return Err(CommerceError::OrderAccessDenied(order_id.to_string()));
        }
        Ok(order.clone())
    }

    /// Gets a user's orders, newest first.
    pub fn get_user_orders(
        &self, customer_id: &CustomerId,
    ) -> Result<Vec<Order>, CommerceError> {
        let orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
        let by_customer =
            self.orders_by_customer.lock().map_err(|_| CommerceError::LockError)?;

        let order_ids = by_customer.get(customer_id).cloned().unwrap_or_default();
        let mut customer_orders: Vec<Order> =
            order_ids.iter().filter_map(|id| orders.get(id).cloned()).collect();

        customer_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customer_orders)
    }

    /// Whether the user has at least one non-cancelled order.
    pub fn user_has_active_orders(
        &self, customer_id: &CustomerId,
    ) -> Result<bool, CommerceError> {
        let active = self
            .get_user_orders(customer_id)?
            .iter()
            .any(|o| o.status != OrderStatus::Cancelled);
        Ok(active)
    }

    /// All orders matching a filter, in no particular order.
    pub fn orders_matching(&self, filter: &OrderFilter) -> Result<Vec<Order>, CommerceError> {
        let orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
        Ok(orders.values().filter(|o| Self::matches_filter(o, filter)).cloned().collect())
    }

    /// Paginated listing for the admin surface, newest first.
    pub fn list_orders(
        &self, filter: &OrderFilter, page: usize, page_size: usize,
    ) -> Result<OrderPage, CommerceError> {
        let mut matching = self.orders_matching(filter)?;
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_count = matching.len();
        let orders: Vec<Order> =
            matching.into_iter().skip(page.saturating_mul(page_size)).take(page_size).collect();
        let has_next = (page + 1).saturating_mul(page_size) < total_count;

        Ok(OrderPage { orders, total_count, page, page_size, has_next })
    }

    /// Order counts per status.
    pub fn count_by_status(&self) -> Result<HashMap<OrderStatus, usize>, CommerceError> {
        let orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;
        let mut counts = HashMap::new();
        for order in orders.values() {
            *counts.entry(order.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Revenue over non-cancelled orders created inside the window.
    pub fn revenue_between(
        &self, from: chrono::DateTime<chrono::Utc>, to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Price, CommerceError> {
        let orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;

        let mut revenue = Price::zero(self.currency.clone());
        for order in orders.values() {
            if order.status != OrderStatus::Cancelled
                && order.created_at >= from
                && order.created_at <= to
            {
                revenue = revenue.add(&order.total_amount)?;
            }
        }
        Ok(revenue)
    }

    /// Top-N products by quantity sold across non-cancelled orders.
    pub fn top_products(&self, limit: usize) -> Result<Vec<TopProduct>, CommerceError> {
        let orders = self.orders.lock().map_err(|_| CommerceError::LockError)?;

        let mut sold: HashMap<_, u64> = HashMap::new();
        for order in orders.values() {
            if order.status == OrderStatus::Cancelled {
                continue;
            }
            for item in &order.items {
                *sold.entry(item.product_id.clone()).or_insert(0) += u64::from(item.quantity);
            }
        }

        let mut ranked: Vec<TopProduct> = sold
            .into_iter()
            .map(|(product_id, quantity_sold)| TopProduct { product_id, quantity_sold })
            .collect();
        ranked.sort_by(|a, b| {
            b.quantity_sold.cmp(&a.quantity_sold).then_with(|| a.product_id.0.cmp(&b.product_id.0))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    fn matches_filter(order: &Order, filter: &OrderFilter) -> bool {
        if let Some(status) = filter.status {
            if order.status != status {
                return false;
            }
        }

        if let Some(payment_status) = filter.payment_status {
            if order.payment_status != payment_status {
                return false;
            }
        }

        if let Some(from) = filter.created_from {
            if order.created_at < from {
                return false;
            }
        }

        if let Some(to) = filter.created_to {
            if order.created_at > to {
                return false;
            }
        }

        true
    }
}

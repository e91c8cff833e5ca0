//! Order implementation.
//!
//! Business logic implementations for the Order type.

use chrono::Utc;

use crate::{
    errors::CommerceError,
    implementation::cart_system::CustomerId,
    implementation::stock_ledger::StockLine,
    types::catalog::Price,
};

use super::super::types::{
    basic_types::{OrderId, OrderStatus, PaymentStatus},
    main_order_types::{Order, OrderItem},
};

impl Order {
    /// Creates a pending order from snapshotted items.
    #[must_use]
    pub fn new(
        customer_id: CustomerId, order_number: String, items: Vec<OrderItem>,
        total_amount: Price,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            order_number,
            customer_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            items,
            total_amount,
            cancellation_reason: None,
            processed_at: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the order can still be cancelled.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.status.is_cancellable()
    }

    /// The stock lines debited when this order was created.
    #[must_use]
    pub fn stock_lines(&self) -> Vec<StockLine> {
        self.items.iter().map(OrderItem::stock_line).collect()
    }

    /// Moves the order to `new_status`, stamping the matching timestamp.
    ///
    /// Transitions outside the state machine are rejected.
    pub fn transition_to(&mut self, new_status: OrderStatus) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(new_status) {
            return Err(CommerceError::InvalidStatusTransition {
                from: self.status.display_name(),
                to:   new_status.display_name(),
            });
        }

        let now = Utc::now();
        match new_status {
            OrderStatus::Processing => self.processed_at = Some(now),
            OrderStatus::Shipped => self.shipped_at = Some(now),
            OrderStatus::Delivered => self.delivered_at = Some(now),
            OrderStatus::Cancelled => self.cancelled_at = Some(now),
            OrderStatus::Pending => {},
        }

        self.status = new_status;
        self.updated_at = now;
        Ok(())
    }

    /// Cancels the order with a reason.
    pub(crate) fn record_cancellation(
        &mut self, reason: impl Into<String>,
    ) -> Result<(), CommerceError> {
        self.transition_to(OrderStatus::Cancelled)?;
        self.cancellation_reason = Some(reason.into());
        Ok(())
    }

    /// Records the payment outcome.
    ///
    /// The payment lifecycle leaves `Pending` exactly once.
    pub(crate) fn record_payment(
        &mut self, result: PaymentStatus,
    ) -> Result<(), CommerceError> {
        if self.payment_status != PaymentStatus::Pending || result == PaymentStatus::Pending {
            return Err(CommerceError::InvalidPaymentTransition {
                from: self.payment_status.display_name(),
                to:   result.display_name(),
            });
        }

        self.payment_status = result;
        self.updated_at = Utc::now();
        Ok(())
    }
}

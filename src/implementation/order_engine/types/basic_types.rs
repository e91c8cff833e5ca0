//! # Order Engine Types - Basic Types
//!
//! Core type definitions for the order engine: identifiers and status enums.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// BASIC IDENTIFIERS
// ============================================================================

/// Unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Cow<'static, str>);

impl OrderId {
    /// Creates a new order ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Generates a new unique order ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Cow::Owned(format!("order-{}", Uuid::new_v4())))
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique order item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderItemId(pub Cow<'static, str>);

impl OrderItemId {
    /// Generates a new unique order item ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Cow::Owned(format!("order-item-{}", Uuid::new_v4())))
    }
}

// ============================================================================
// STATUS ENUMS
// ============================================================================

/// Order status.
///
/// The state machine is `Pending -> Processing -> Shipped -> Delivered`, with
/// `Pending` and `Processing` also allowed to move to `Cancelled`. No
/// transition leaves `Delivered` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order created, awaiting payment.
    #[default]
    Pending,
    /// Payment received, order being processed.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Whether the order can still be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Whether the status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving to `next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (*self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (Self::Pending | Self::Processing, Self::Cancelled)
        )
    }

    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Payment status, independent of the order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Payment completed.
    Completed,
    /// Payment failed.
    Failed,
}

impl PaymentStatus {
    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

//! Error types for the commerce core

use std::fmt;

use thiserror::Error;

/// One stock-validation failure, with enough detail for the caller to
/// resolve it without a second round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortfall {
    /// Product ID.
    pub product_id: String,
    /// Variant ID, when the line referenced a variant.
    pub variant_id: Option<String>,
    /// Quantity requested.
    pub requested:  u32,
    /// Quantity actually available.
    pub available:  i64,
}

impl fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant_id {
            Some(variant_id) => write!(
                f,
                "{} (variant {}): requested {}, available {}",
                self.product_id, variant_id, self.requested, self.available
            ),
            None => write!(
                f,
                "{}: requested {}, available {}",
                self.product_id, self.requested, self.available
            ),
        }
    }
}

/// Broad failure classification surfaced at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    InvalidArgument,
    /// Operation not allowed given current data.
    InvalidState,
    /// One or more lines failed stock validation.
    InsufficientStock,
    /// Referenced resource does not exist.
    NotFound,
    /// Actor does not own the resource.
    PermissionDenied,
    /// Infrastructure failure.
    Internal,
}

/// Commerce-specific errors.
#[derive(Debug, Clone, Error)]
pub enum CommerceError {
    /// Lock acquisition failed.
    #[error("failed to acquire lock")]
    LockError,
    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),
    /// Product already exists.
    #[error("product already exists: {0}")]
    ProductAlreadyExists(String),
    /// Variant not found.
    #[error("variant not found: {0}")]
    VariantNotFound(String),
    /// Order not found.
    #[error("order not found: {0}")]
    OrderNotFound(String),
    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(String),
    /// Username already taken.
    #[error("username already taken: {0}")]
    UsernameTaken(String),
    /// Cart is empty.
    #[error("cart is empty")]
    CartEmpty,
    /// Cart item does not belong to the requesting user.
    #[error("cart item does not belong to requesting user: {0}")]
    CartItemNotOwned(String),
    /// Order does not belong to the requesting user.
    #[error("order does not belong to requesting user: {0}")]
    OrderAccessDenied(String),
    /// Invalid quantity.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    /// Explicit order request carried no items.
    #[error("order request has no items")]
    EmptyOrderRequest,
    /// Product not available for purchase.
    #[error("product not available: {0}")]
    ProductNotAvailable(String),
    /// Product has neither variants nor an own price.
    #[error("product has no price set: {0}")]
    ProductPriceNotSet(String),
    /// Order is past the cancellable states.
    #[error("order cannot be cancelled: {0}")]
    OrderNotCancellable(String),
    /// Requested status transition is not in the state machine.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: &'static str,
        /// Requested status.
        to:   &'static str,
    },
    /// Payment result already recorded or out of order.
    #[error("invalid payment transition: {from} -> {to}")]
    InvalidPaymentTransition {
        /// Current payment status.
        from: &'static str,
        /// Requested payment status.
        to:   &'static str,
    },
    /// Insufficient stock, listing every offending line.
    #[error("insufficient stock for {} line(s)", .0.len())]
    InsufficientStock(Vec<StockShortfall>),
    /// Currency mismatch.
    #[error("currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Expected currency.
        expected: String,
        /// Received currency.
        got:      String,
    },
}

impl CommerceError {
    /// Classifies the error into the boundary taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuantity | Self::EmptyOrderRequest => ErrorKind::InvalidArgument,
            Self::CartEmpty
            | Self::ProductNotAvailable(_)
            | Self::ProductPriceNotSet(_)
            | Self::OrderNotCancellable(_)
            | Self::InvalidStatusTransition { .. }
            | Self::InvalidPaymentTransition { .. }
            | Self::ProductAlreadyExists(_)
            | Self::UsernameTaken(_) => ErrorKind::InvalidState,
            Self::InsufficientStock(_) => ErrorKind::InsufficientStock,
            Self::ProductNotFound(_)
            | Self::VariantNotFound(_)
            | Self::OrderNotFound(_)
            | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::CartItemNotOwned(_) | Self::OrderAccessDenied(_) => ErrorKind::PermissionDenied,
            Self::LockError | Self::CurrencyMismatch { .. } => ErrorKind::Internal,
        }
    }

    /// User-facing message.
    ///
    /// Not-found and permission failures collapse to a generic response so
    /// callers cannot probe whether a resource exists.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                "cannot access requested resource".to_string()
            },
            ErrorKind::Internal => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for commerce operations.
pub type CommerceResult<T> = Result<T, CommerceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_display_lists_requested_vs_available() {
        let shortfall = StockShortfall {
            product_id: "prod-1".to_string(),
            variant_id: None,
            requested:  3,
            available:  2,
        };
        assert_eq!(shortfall.to_string(), "prod-1: requested 3, available 2");
    }

    #[test]
    fn test_access_errors_do_not_leak_resource_existence() {
        let not_found = CommerceError::OrderNotFound("order-1".to_string());
        let denied = CommerceError::OrderAccessDenied("order-1".to_string());

        assert_eq!(not_found.public_message(), denied.public_message());
        assert!(!not_found.public_message().contains("order-1"));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(CommerceError::InvalidQuantity.kind(), ErrorKind::InvalidArgument);
        assert_eq!(CommerceError::CartEmpty.kind(), ErrorKind::InvalidState);
        assert_eq!(
            CommerceError::InsufficientStock(Vec::new()).kind(),
            ErrorKind::InsufficientStock
        );
    }
}

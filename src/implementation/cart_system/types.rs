//! Core type definitions for the cart system

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique cart identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartId(pub Cow<'static, str>);

impl CartId {
    /// Creates a new cart ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Generates a new unique cart ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Cow::Owned(format!("cart-{}", Uuid::new_v4())))
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique cart item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartItemId(pub Cow<'static, str>);

impl CartItemId {
    /// Creates a new cart item ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Generates a new unique cart item ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Cow::Owned(format!("cart-item-{}", Uuid::new_v4())))
    }
}

impl std::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User/customer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Cow<'static, str>);

impl CustomerId {
    /// Creates a new customer ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Creates a customer ID from a static string slice (zero-copy).
    #[must_use]
    pub fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Generates a new unique customer ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Cow::Owned(format!("user-{}", Uuid::new_v4())))
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

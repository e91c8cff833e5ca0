//! # Catalog Types
//!
//! Type definitions for the catalog read model consumed by the core: products
//! and variants with price and stock.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CommerceError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Unique product identifier.
///
/// Variants draw their ids from the same namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Cow<'static, str>);

impl ProductId {
    /// Creates a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Creates a product ID from a static string slice (zero-copy).
    #[must_use]
    pub fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Generates a new unique product ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Cow::Owned(format!("prod-{}", Uuid::new_v4())))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique SKU (Stock Keeping Unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(pub Cow<'static, str>);

impl Sku {
    /// Creates a new SKU.
    #[must_use]
    pub fn new(sku: impl Into<String>) -> Self {
        Self(Cow::Owned(sku.into()))
    }

    /// Creates a SKU from a static string slice (zero-copy).
    #[must_use]
    pub fn from_static(sku: &'static str) -> Self {
        Self(Cow::Borrowed(sku))
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    /// Product is active and available.
    #[default]
    Active,
    /// Product is inactive but not deleted.
    Inactive,
    /// Product is a draft (not published).
    Draft,
    /// Product is discontinued.
    Discontinued,
}

impl ProductStatus {
    /// Whether the product can be purchased.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Currency code (ISO 4217).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    /// Creates a new currency code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// US Dollar.
    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_string())
    }
}

/// Price with currency.
///
/// Amounts are fixed-point decimals; money never touches binary floating
/// point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Decimal amount.
    pub amount:   Decimal,
    /// Currency code.
    pub currency: Currency,
}

impl Price {
    /// Creates a new price.
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Creates a price in US dollars.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, Currency::usd())
    }

    /// Adds another price (must be same currency).
    ///
    /// # Errors
    /// Returns error if currencies don't match.
    pub fn add(&self, other: &Price) -> Result<Price, CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.0.clone(),
                got:      other.currency.0.clone(),
            });
        }
        Ok(Price::new(self.amount + other.amount, self.currency.clone()))
    }

    /// Multiplies by a quantity.
    #[must_use]
    pub fn multiply(&self, quantity: u32) -> Price {
        Price::new(self.amount * Decimal::from(quantity), self.currency.clone())
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::usd(Decimal::ZERO)
    }
}

// ============================================================================
// PRODUCT & VARIANT
// ============================================================================

/// Product variant for configurable products.
///
/// A variant carries its own price and its own stock counter; the parent's
/// counter is unused while variants exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id:        ProductId,
    /// Parent product ID.
    pub parent_id: ProductId,
    /// Variant SKU.
    pub sku:       Sku,
    /// Variant price.
    pub price:     Price,
    /// Stock count for this variant.
    pub stock:     i64,
}

impl ProductVariant {
    /// Creates a new variant.
    #[must_use]
    pub fn new(id: ProductId, parent_id: ProductId, sku: Sku, price: Price) -> Self {
        Self { id, parent_id, sku, price, stock: 0 }
    }

    /// Sets the stock count.
    #[must_use]
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }
}

/// Complete product definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id:          ProductId,
    /// Product SKU.
    pub sku:         Sku,
    /// Product name.
    pub name:        String,
    /// Product description.
    pub description: String,
    /// Product status.
    pub status:      ProductStatus,
    /// Own price, for products sold without variants.
    pub price:       Option<Price>,
    /// Stock count, used when the product has no variants.
    pub stock:       i64,
    /// Product variants.
    pub variants:    Vec<ProductVariant>,
    /// Creation timestamp.
    pub created_at:  DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at:  DateTime<Utc>,
}

impl Product {
    /// Creates a new active product.
    #[must_use]
    pub fn new(id: ProductId, sku: Sku, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            sku,
            name: name.into(),
            description: String::new(),
            status: ProductStatus::Active,
            price: None,
            stock: 0,
            variants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the product's own price.
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the product's own stock count.
    #[must_use]
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a variant.
    #[must_use]
    pub fn with_variant(mut self, variant: ProductVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Whether the product has variants.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Finds a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &ProductId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }
}

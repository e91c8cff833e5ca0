//! Stock ledger service

use tracing::debug;

use crate::{
    errors::{CommerceError, StockShortfall},
    implementation::catalog_store::{CatalogStore, CatalogTables},
    types::catalog::ProductId,
};

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Order creation: `stock -= quantity`.
    Debit,
    /// Cancellation: `stock += quantity`.
    Credit,
}

/// One (product, variant, quantity) adjustment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLine {
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID, when the line targets a variant's stock.
    pub variant_id: Option<ProductId>,
    /// Quantity.
    pub quantity:   u32,
}

impl StockLine {
    /// Creates a new stock line.
    #[must_use]
    pub fn new(product_id: ProductId, variant_id: Option<ProductId>, quantity: u32) -> Self {
        Self { product_id, variant_id, quantity }
    }
}

/// Stock ledger service.
#[derive(Debug, Clone)]
pub struct StockLedger {
    /// Catalog whose stock counters the ledger owns.
    catalog: CatalogStore,
}

impl StockLedger {
    /// Creates a ledger over the given catalog.
    #[must_use]
    pub fn new(catalog: CatalogStore) -> Self {
        Self { catalog }
    }

    /// Checks `stock >= quantity` for every line.
    ///
    /// All violations are collected, so the caller can surface the complete
    /// picture in one round trip.
    pub fn validate(&self, lines: &[StockLine]) -> Result<(), CommerceError> {
        self.catalog.with_tables_mut(|tables| Self::validate_in(tables, lines))?
    }

    /// Applies `stock -= quantity` (Debit) or `stock += quantity` (Credit)
    /// per line, all under one lock acquisition.
    ///
    /// Debit assumes a prior successful [`validate`](Self::validate) in the
    /// same lock scope; credit never re-checks, since restoring stock cannot
    /// make it invalid.
    pub fn adjust(
        &self, lines: &[StockLine], direction: StockDirection,
    ) -> Result<(), CommerceError> {
        self.catalog.with_tables_mut(|tables| Self::adjust_in(tables, lines, direction))?
    }

    /// Validates and debits in a single lock scope.
    ///
    /// This is the transaction used by order creation: two concurrent orders
    /// against the same product cannot both pass validation and then jointly
    /// overdraw, because the second caller only sees post-debit counters.
    pub fn reserve(&self, lines: &[StockLine]) -> Result<(), CommerceError> {
        self.catalog.with_tables_mut(|tables| {
            Self::validate_in(tables, lines)?;
            Self::adjust_in(tables, lines, StockDirection::Debit)
        })?
    }

    /// Credits every line back. Pure reversal of a previous debit.
    pub fn release(&self, lines: &[StockLine]) -> Result<(), CommerceError> {
        self.adjust(lines, StockDirection::Credit)
    }

    fn validate_in(tables: &mut CatalogTables, lines: &[StockLine]) -> Result<(), CommerceError> {
        let mut shortfalls = Vec::new();

        for line in lines {
            let available = tables.stock_of(&line.product_id, line.variant_id.as_ref())?;
            if available < i64::from(line.quantity) {
                shortfalls.push(StockShortfall {
                    product_id: line.product_id.to_string(),
                    variant_id: line.variant_id.as_ref().map(ToString::to_string),
                    requested:  line.quantity,
                    available,
                });
            }
        }

        if shortfalls.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::InsufficientStock(shortfalls))
        }
    }

    fn adjust_in(
        tables: &mut CatalogTables, lines: &[StockLine], direction: StockDirection,
    ) -> Result<(), CommerceError> {
        for line in lines {
            let stock = tables.stock_mut(&line.product_id, line.variant_id.as_ref())?;
            let delta = i64::from(line.quantity);
            *stock = match direction {
                StockDirection::Debit => stock.saturating_sub(delta),
                StockDirection::Credit => stock.saturating_add(delta),
            };
            debug!(
                product_id = %line.product_id,
                quantity = line.quantity,
                ?direction,
                "stock adjusted"
            );
        }
        Ok(())
    }
}

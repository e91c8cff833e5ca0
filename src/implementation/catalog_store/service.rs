//! Catalog store service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::Utc;

use crate::{
    errors::CommerceError,
    types::catalog::{Price, Product, ProductId, ProductVariant},
};

/// The catalog tables, guarded together by one lock.
///
/// Holding the guard over both tables is the atomic scope the Stock Ledger
/// relies on: validation and adjustment for one order happen under a single
/// acquisition, so no other caller can observe an intermediate stock level.
#[derive(Debug, Default)]
pub(crate) struct CatalogTables {
    /// Products indexed by ID, variants nested.
    pub(crate) products:       HashMap<ProductId, Product>,
    /// Variant ID to parent product ID.
    pub(crate) variant_parent: HashMap<ProductId, ProductId>,
}

impl CatalogTables {
    /// Resolves the stock counter a line points at: the variant's when a
    /// variant id is given, the product's own otherwise.
    pub(crate) fn stock_mut(
        &mut self, product_id: &ProductId, variant_id: Option<&ProductId>,
    ) -> Result<&mut i64, CommerceError> {
        match variant_id {
            Some(variant_id) => {
                let parent = self
                    .variant_parent
                    .get(variant_id)
                    .cloned()
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))?;
                let product = self
                    .products
                    .get_mut(&parent)
                    .ok_or_else(|| CommerceError::ProductNotFound(parent.to_string()))?;
                product
                    .variants
                    .iter_mut()
                    .find(|v| &v.id == variant_id)
                    .map(|v| &mut v.stock)
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))
            },
            None => self
                .products
                .get_mut(product_id)
                .map(|p| &mut p.stock)
                .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string())),
        }
    }

    /// Reads the stock counter a line points at.
    pub(crate) fn stock_of(
        &self, product_id: &ProductId, variant_id: Option<&ProductId>,
    ) -> Result<i64, CommerceError> {
        match variant_id {
            Some(variant_id) => {
                let parent = self
                    .variant_parent
                    .get(variant_id)
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))?;
                let product = self
                    .products
                    .get(parent)
                    .ok_or_else(|| CommerceError::ProductNotFound(parent.to_string()))?;
                product
                    .variant(variant_id)
                    .map(|v| v.stock)
                    .ok_or_else(|| CommerceError::VariantNotFound(variant_id.to_string()))
            },
            None => self
                .products
                .get(product_id)
                .map(|p| p.stock)
                .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string())),
        }
    }
}

/// Catalog store service.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    /// Catalog tables behind a single lock.
    tables: Arc<Mutex<CatalogTables>>,
}

impl CatalogStore {
    /// Creates an empty catalog store.
    #[must_use]
    pub fn new() -> Self {
        Self { tables: Arc::new(Mutex::new(CatalogTables::default())) }
    }

    /// Registers a product and indexes its variants.
    pub fn add_product(&self, product: Product) -> Result<(), CommerceError> {
        let mut tables = self.tables.lock().map_err(|_| CommerceError::LockError)?;

        if tables.products.contains_key(&product.id) {
            return Err(CommerceError::ProductAlreadyExists(product.id.to_string()));
        }

        for variant in &product.variants {
            tables.variant_parent.insert(variant.id.clone(), product.id.clone());
        }
        tables.products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Gets a product by ID.
    pub fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let tables = self.tables.lock().map_err(|_| CommerceError::LockError)?;
        tables
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Gets a variant by ID.
    pub fn get_variant(&self, id: &ProductId) -> Result<ProductVariant, CommerceError> {
        let tables = self.tables.lock().map_err(|_| CommerceError::LockError)?;
        let parent = tables
            .variant_parent
            .get(id)
            .ok_or_else(|| CommerceError::VariantNotFound(id.to_string()))?;
        tables
            .products
            .get(parent)
            .and_then(|p| p.variant(id))
            .cloned()
            .ok_or_else(|| CommerceError::VariantNotFound(id.to_string()))
    }

    /// Updates a product's own price.
    ///
    /// Later catalog edits never reach prices already locked into carts or
    /// snapshotted onto orders.
    pub fn set_product_price(&self, id: &ProductId, price: Price) -> Result<(), CommerceError> {
        let mut tables = self.tables.lock().map_err(|_| CommerceError::LockError)?;
        let product = tables
            .products
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        product.price = Some(price);
        product.updated_at = Utc::now();
        Ok(())
    }

    /// Updates a variant's price.
    pub fn set_variant_price(&self, id: &ProductId, price: Price) -> Result<(), CommerceError> {
        let mut tables = self.tables.lock().map_err(|_| CommerceError::LockError)?;
        let parent = tables
            .variant_parent
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::VariantNotFound(id.to_string()))?;
        let product = tables
            .products
            .get_mut(&parent)
            .ok_or_else(|| CommerceError::ProductNotFound(parent.to_string()))?;
        let variant = product
            .variants
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| CommerceError::VariantNotFound(id.to_string()))?;
        variant.price = price;
        product.updated_at = Utc::now();
        Ok(())
    }

    /// Runs `f` with exclusive access to the catalog tables.
    ///
    /// This is the transaction scope handed to the Stock Ledger; no other
    /// code path may mutate stock.
    pub(crate) fn with_tables_mut<R>(
        &self, f: impl FnOnce(&mut CatalogTables) -> R,
    ) -> Result<R, CommerceError> {
        let mut tables = self.tables.lock().map_err(|_| CommerceError::LockError)?;
        Ok(f(&mut tables))
    }
}

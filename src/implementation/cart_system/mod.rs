//! # Cart System
//!
//! Per-user shopping cart with locked unit prices.

mod cart;
mod item;
mod service;
mod types;

pub use cart::Cart;
pub use item::CartItem;
pub use service::CartService;
pub use types::{CartId, CartItemId, CustomerId};

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        errors::{CommerceError, ErrorKind},
        implementation::catalog_store::CatalogStore,
        types::catalog::{Currency, Price, Product, ProductId, ProductVariant, Sku},
    };

    fn test_catalog() -> CatalogStore {
        let catalog = CatalogStore::new();

        let simple = Product::new(ProductId::new("001"), Sku::new("SKU-001"), "Product 001")
            .with_price(Price::usd(Decimal::new(1000, 2)))
            .with_stock(100);
        catalog.add_product(simple).expect("add simple");

        let parent_id = ProductId::new("002");
        let configurable = Product::new(parent_id.clone(), Sku::new("SKU-002"), "Product 002")
            .with_variant(
                ProductVariant::new(
                    ProductId::new("002-red"),
                    parent_id,
                    Sku::new("SKU-002-RED"),
                    Price::usd(Decimal::new(2500, 2)),
                )
                .with_stock(50),
            );
        catalog.add_product(configurable).expect("add configurable");

        let unpriced = Product::new(ProductId::new("003"), Sku::new("SKU-003"), "Product 003");
        catalog.add_product(unpriced).expect("add unpriced");

        catalog
    }

    fn test_service() -> (CartService, CatalogStore) {
        let catalog = test_catalog();
        (CartService::new(catalog.clone(), Currency::usd()), catalog)
    }

    #[test]
    fn test_add_item_locks_product_price() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        let item = service
            .add_item(&customer, &ProductId::new("001"), None, 2)
            .expect("should add item");

        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_add_same_item_increases_quantity_and_keeps_price() {
        let (service, catalog) = test_service();
        let customer = CustomerId::new("customer-1");
        let product_id = ProductId::new("001");

        service.add_item(&customer, &product_id, None, 2).expect("add first");

        // Catalog price changes must not reach the already-locked row.
        catalog
            .set_product_price(&product_id, Price::usd(Decimal::new(9999, 2)))
            .expect("reprice");

        let item = service.add_item(&customer, &product_id, None, 3).expect("add second");

        assert_eq!(item.quantity, 5);
        assert_eq!(item.unit_price.amount, Decimal::new(1000, 2));

        let cart = service.get_cart(&customer).expect("get").expect("cart");
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_add_item_locks_variant_price() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        let item = service
            .add_item(
                &customer,
                &ProductId::new("002"),
                Some(&ProductId::new("002-red")),
                1,
            )
            .expect("should add variant item");

        assert_eq!(item.unit_price.amount, Decimal::new(2500, 2));
        assert_eq!(item.sku, Sku::new("SKU-002-RED"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        let result = service.add_item(&customer, &ProductId::new("001"), None, 0);
        assert!(matches!(result, Err(CommerceError::InvalidQuantity)));
    }

    #[test]
    fn test_unpriced_product_rejected() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        let result = service.add_item(&customer, &ProductId::new("003"), None, 1);
        assert!(matches!(result, Err(CommerceError::ProductPriceNotSet(_))));
    }

    #[test]
    fn test_update_item_checks_ownership() {
        let (service, _) = test_service();
        let owner = CustomerId::new("customer-1");
        let stranger = CustomerId::new("customer-2");

        let item = service.add_item(&owner, &ProductId::new("001"), None, 1).expect("add");

        let result = service.update_item(&stranger, &item.id, 4);
        let err = result.expect_err("stranger must be rejected");
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let updated = service.update_item(&owner, &item.id, 4).expect("owner update");
        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.unit_price, item.unit_price);
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        let item = service.add_item(&customer, &ProductId::new("001"), None, 1).expect("add");

        service.remove_item(&customer, &item.id).expect("first remove");
        service.remove_item(&customer, &item.id).expect("second remove");

        let cart = service.get_cart(&customer).expect("get").expect("cart");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_cart_twice_on_empty_cart() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        service.add_item(&customer, &ProductId::new("001"), None, 2).expect("add");

        service.clear_cart(&customer).expect("first clear");
        service.clear_cart(&customer).expect("second clear");

        let cart = service.get_cart(&customer).expect("get").expect("cart");
        assert_eq!(cart.unique_item_count(), 0);
    }

    #[test]
    fn test_totals_for_missing_cart_is_zero() {
        let (service, _) = test_service();

        let total = service.get_totals(&CustomerId::new("nobody")).expect("totals");
        assert_eq!(total.amount, Decimal::ZERO);
    }

    #[test]
    fn test_totals_sum_locked_prices() {
        let (service, _) = test_service();
        let customer = CustomerId::new("customer-1");

        service.add_item(&customer, &ProductId::new("001"), None, 2).expect("add 1");
        service
            .add_item(
                &customer,
                &ProductId::new("002"),
                Some(&ProductId::new("002-red")),
                1,
            )
            .expect("add 2");

        let total = service.get_totals(&customer).expect("totals");
        assert_eq!(total.amount, Decimal::new(4500, 2)); // 2 x 10.00 + 1 x 25.00
    }
}

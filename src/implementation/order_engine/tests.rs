// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use crate::{
        errors::{CommerceError, ErrorKind},
        implementation::{
            cart_system::{CartService, CustomerId},
            catalog_store::CatalogStore,
            order_engine::{
                OrderEngine, OrderFilter, OrderLine, OrderStatus, PaymentStatus,
            },
            stock_ledger::StockLedger,
            user_directory::{User, UserDirectory},
        },
        types::catalog::{Currency, Price, Product, ProductId, ProductVariant, Sku},
    };

    struct Fixture {
        engine:  OrderEngine,
        carts:   CartService,
        catalog: CatalogStore,
        users:   UserDirectory,
    }

    fn fixture() -> Fixture {
        let catalog = CatalogStore::new();
        let users = UserDirectory::new();
        let carts = CartService::new(catalog.clone(), Currency::usd());
        let ledger = StockLedger::new(catalog.clone());
        let engine = OrderEngine::new(
            catalog.clone(),
            ledger,
            carts.clone(),
            users.clone(),
            Currency::usd(),
        );
        Fixture { engine, carts, catalog, users }
    }

    fn register_user(fixture: &Fixture, username: &str) -> CustomerId {
        let user = User::new(username, format!("{}@example.com", username));
        let id = user.id.clone();
        fixture.users.add_user(user).expect("add user");
        id
    }

    fn seed_product(fixture: &Fixture, id: &str, price_cents: i64, stock: i64) -> ProductId {
        let product_id = ProductId::new(id);
        fixture
            .catalog
            .add_product(
                Product::new(product_id.clone(), Sku::new(format!("SKU-{}", id)), format!("Product {}", id))
                    .with_description(format!("Description of {}", id))
                    .with_price(Price::usd(Decimal::new(price_cents, 2)))
                    .with_stock(stock),
            )
            .expect("add product");
        product_id
    }

    #[test]
    fn test_create_order_from_cart_debits_stock_and_clears_cart() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 5);

        fixture.carts.add_item(&customer, &product_id, None, 3).expect("add to cart");

        let order = fixture.engine.create_order_from_cart(&customer).expect("create order");

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total_amount.amount, Decimal::new(3000, 2)); // 30.00
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);

        let product = fixture.catalog.get_product(&product_id).expect("get");
        assert_eq!(product.stock, 2);

        let cart = fixture.carts.get_cart(&customer).expect("get cart").expect("cart");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insufficient_stock_aborts_with_no_side_effects() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 2);

        fixture.carts.add_item(&customer, &product_id, None, 3).expect("add to cart");

        let result = fixture.engine.create_order_from_cart(&customer);
        match result {
            Err(CommerceError::InsufficientStock(shortfalls)) => {
                assert_eq!(shortfalls.len(), 1);
                assert_eq!(shortfalls[0].product_id, "P");
                assert_eq!(shortfalls[0].requested, 3);
                assert_eq!(shortfalls[0].available, 2);
            },
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        // No order, no debit, cart untouched.
        assert!(fixture.engine.get_user_orders(&customer).expect("orders").is_empty());
        let product = fixture.catalog.get_product(&product_id).expect("get");
        assert_eq!(product.stock, 2);
        let cart = fixture.carts.get_cart(&customer).expect("get cart").expect("cart");
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_create_order_from_empty_cart_rejected() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");

        let result = fixture.engine.create_order_from_cart(&customer);
        assert!(matches!(result, Err(CommerceError::CartEmpty)));
    }

    #[test]
    fn test_create_order_from_empty_explicit_list_rejected() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");

        let result = fixture.engine.create_order(&customer, &[]);
        let err = result.expect_err("empty list must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_create_order_for_unknown_user_rejected() {
        let fixture = fixture();
        let product_id = seed_product(&fixture, "P", 1000, 5);

        let result = fixture.engine.create_order(
            &CustomerId::new("ghost"),
            &[OrderLine::new(product_id, None, 1)],
        );
        assert!(matches!(result, Err(CommerceError::UserNotFound(_))));
    }

    #[test]
    fn test_explicit_order_snapshots_variant_price() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");

        let parent_id = ProductId::new("V");
        let variant_id = ProductId::new("V-large");
        fixture
            .catalog
            .add_product(
                Product::new(parent_id.clone(), Sku::new("SKU-V"), "Product V")
                    .with_variant(
                        ProductVariant::new(
                            variant_id.clone(),
                            parent_id.clone(),
                            Sku::new("SKU-V-L"),
                            Price::usd(Decimal::new(1999, 2)),
                        )
                        .with_stock(10),
                    ),
            )
            .expect("add product");

        let order = fixture
            .engine
            .create_order(
                &customer,
                &[OrderLine::new(parent_id, Some(variant_id.clone()), 2)],
            )
            .expect("create");

        assert_eq!(order.items[0].price.amount, Decimal::new(1999, 2));
        assert_eq!(order.items[0].sku, Sku::new("SKU-V-L"));
        assert_eq!(order.total_amount.amount, Decimal::new(3998, 2));

        let variant = fixture.catalog.get_variant(&variant_id).expect("variant");
        assert_eq!(variant.stock, 8);
    }

    #[test]
    fn test_order_item_price_immutable_under_catalog_reprice() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 5);

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id.clone(), None, 1)])
            .expect("create");

        fixture
            .catalog
            .set_product_price(&product_id, Price::usd(Decimal::new(123_456, 2)))
            .expect("reprice");

        let reread = fixture.engine.get_order(&order.id, &customer).expect("get");
        assert_eq!(reread.items[0].price.amount, Decimal::new(1000, 2));
        assert_eq!(reread.total_amount.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn test_cancel_processing_order_credits_stock() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id.clone(), None, 4)])
            .expect("create");
        fixture
            .engine
            .update_status(&order.id, OrderStatus::Processing, "admin")
            .expect("to processing");

        let cancelled = fixture
            .engine
            .cancel_order(&order.id, "changed my mind", &customer)
            .expect("cancel");

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("changed my mind"));

        let product = fixture.catalog.get_product(&product_id).expect("get");
        assert_eq!(product.stock, 10);
    }

    #[test]
    fn test_cancel_by_foreign_user_rejected_and_order_unchanged() {
        let fixture = fixture();
        let owner = register_user(&fixture, "alice");
        let stranger = register_user(&fixture, "mallory");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&owner, &[OrderLine::new(product_id.clone(), None, 4)])
            .expect("create");

        let result = fixture.engine.cancel_order(&order.id, "not mine", &stranger);
        let err = result.expect_err("stranger must be rejected");
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let unchanged = fixture.engine.get_order(&order.id, &owner).expect("get");
        assert_eq!(unchanged.status, OrderStatus::Pending);
        assert!(unchanged.cancelled_at.is_none());
        let product = fixture.catalog.get_product(&product_id).expect("get");
        assert_eq!(product.stock, 6);
    }

    #[test]
    fn test_cancel_shipped_order_rejected() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id, None, 1)])
            .expect("create");
        fixture
            .engine
            .update_status(&order.id, OrderStatus::Processing, "admin")
            .expect("processing");
        fixture.engine.update_status(&order.id, OrderStatus::Shipped, "admin").expect("shipped");

        let result = fixture.engine.cancel_order(&order.id, "too late", &customer);
        assert!(matches!(result, Err(CommerceError::OrderNotCancellable(_))));
    }

    #[test]
    fn test_update_status_stamps_timestamps_in_sequence() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id, None, 1)])
            .expect("create");

        let order = fixture
            .engine
            .update_status(&order.id, OrderStatus::Processing, "admin")
            .expect("processing");
        assert!(order.processed_at.is_some());

        let order =
            fixture.engine.update_status(&order.id, OrderStatus::Shipped, "admin").expect("shipped");
        assert!(order.shipped_at.is_some());

        let order = fixture
            .engine
            .update_status(&order.id, OrderStatus::Delivered, "admin")
            .expect("delivered");
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id, None, 1)])
            .expect("create");

        // Skipping Processing is not in the state machine.
        let result = fixture.engine.update_status(&order.id, OrderStatus::Shipped, "admin");
        assert!(matches!(result, Err(CommerceError::InvalidStatusTransition { .. })));

        fixture
            .engine
            .update_status(&order.id, OrderStatus::Processing, "admin")
            .expect("processing");
        fixture.engine.update_status(&order.id, OrderStatus::Shipped, "admin").expect("shipped");
        fixture
            .engine
            .update_status(&order.id, OrderStatus::Delivered, "admin")
            .expect("delivered");

        // Delivered is terminal.
        let result = fixture.engine.update_status(&order.id, OrderStatus::Pending, "admin");
        let err = result.expect_err("terminal state must reject transitions");
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_payment_result_recorded_exactly_once() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id, None, 1)])
            .expect("create");

        let order = fixture
            .engine
            .record_payment_result(&order.id, PaymentStatus::Completed)
            .expect("record");
        assert_eq!(order.payment_status, PaymentStatus::Completed);

        let result = fixture.engine.record_payment_result(&order.id, PaymentStatus::Failed);
        assert!(matches!(result, Err(CommerceError::InvalidPaymentTransition { .. })));
    }

    #[test]
    fn test_get_order_checks_ownership() {
        let fixture = fixture();
        let owner = register_user(&fixture, "alice");
        let stranger = register_user(&fixture, "mallory");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        let order = fixture
            .engine
            .create_order(&owner, &[OrderLine::new(product_id, None, 1)])
            .expect("create");

        let err = fixture.engine.get_order(&order.id, &stranger).expect_err("denied");
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_user_has_active_orders_ignores_cancelled() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let product_id = seed_product(&fixture, "P", 1000, 10);

        assert!(!fixture.engine.user_has_active_orders(&customer).expect("check"));

        let order = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(product_id, None, 1)])
            .expect("create");
        assert!(fixture.engine.user_has_active_orders(&customer).expect("check"));

        fixture.engine.cancel_order(&order.id, "mind changed", &customer).expect("cancel");
        assert!(!fixture.engine.user_has_active_orders(&customer).expect("check"));
    }

    #[test]
    fn test_admin_listing_and_metrics() {
        let fixture = fixture();
        let customer = register_user(&fixture, "alice");
        let p1 = seed_product(&fixture, "P1", 1000, 100);
        let p2 = seed_product(&fixture, "P2", 500, 100);

        let first = fixture
            .engine
            .create_order(&customer, &[OrderLine::new(p1.clone(), None, 5)])
            .expect("first");
        fixture
            .engine
            .create_order(
                &customer,
                &[OrderLine::new(p1.clone(), None, 2), OrderLine::new(p2.clone(), None, 8)],
            )
            .expect("second");
        fixture.engine.cancel_order(&first.id, "mind changed", &customer).expect("cancel");

        let counts = fixture.engine.count_by_status().expect("counts");
        assert_eq!(counts.get(&OrderStatus::Pending), Some(&1));
        assert_eq!(counts.get(&OrderStatus::Cancelled), Some(&1));

        let page = fixture
            .engine
            .list_orders(&OrderFilter::new().with_status(OrderStatus::Pending), 0, 10)
            .expect("list");
        assert_eq!(page.total_count, 1);
        assert!(!page.has_next);

        // Cancelled orders drop out of revenue and top-seller figures.
        let revenue = fixture
            .engine
            .revenue_between(Utc::now() - Duration::hours(1), Utc::now())
            .expect("revenue");
        assert_eq!(revenue.amount, Decimal::new(6000, 2)); // 2 x 10.00 + 8 x 5.00

        let top = fixture.engine.top_products(1).expect("top");
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, p2);
        assert_eq!(top[0].quantity_sold, 8);
    }
}

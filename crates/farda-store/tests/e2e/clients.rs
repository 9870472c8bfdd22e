//! Client registry tests: creation, listing, and delete protection.

use super::common::*;
use farda_core::PaymentMethod;
use farda_store::{NewOrder, NewOrderLine, StoreError};

pub async fn run_all_tests(ctx: &TestContext) {
    test_create_client_appears_in_listing(ctx).await;
    test_client_with_orders_cannot_be_deleted(ctx).await;
    test_delete_unknown_client_is_not_found(ctx).await;
}

pub async fn test_create_client_appears_in_listing(ctx: &TestContext) {
    println!("  🧪 test_create_client_appears_in_listing");

    let created = ctx.new_client("Maria Souza").await;
    assert!(created.id > 0);

    let listing = ctx.clients().list().await.unwrap();
    assert!(
        listing.iter().any(|c| c.id == created.id && c.name == "Maria Souza"),
        "created client should appear in the listing"
    );

    println!("     ✓ Client persisted and listed");
}

pub async fn test_client_with_orders_cannot_be_deleted(ctx: &TestContext) {
    println!("  🧪 test_client_with_orders_cannot_be_deleted");

    let school = ctx.new_school("Escola Deletion Guard").await;
    let client = ctx.new_client("Joao Pereira").await;
    let product = ctx.new_product("Guard Polo", school.id, 30.0, 10).await;

    ctx.orders()
        .create(
            NewOrder {
                client_id: client.id,
                school_id: school.id,
                expected_delivery: None,
                payment_method: PaymentMethod::Cash,
                notes: None,
                seller_id: None,
                lines: vec![NewOrderLine {
                    product_id: product.id,
                    quantity: 1,
                }],
            },
            Some("tester"),
        )
        .await
        .unwrap();

    let err = ctx.clients().delete(client.id).await.unwrap_err();
    assert!(
        matches!(err, StoreError::ClientHasOrders),
        "expected ClientHasOrders, got {err:?}"
    );

    println!("     ✓ Delete refused while orders exist");
}

pub async fn test_delete_unknown_client_is_not_found(ctx: &TestContext) {
    println!("  🧪 test_delete_unknown_client_is_not_found");

    let err = ctx.clients().delete(999_999).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    println!("     ✓ Unknown client reported as not found");
}

//! Order lifecycle tests: placement, stock deduction, totals, status flow,
//! cancellation and deletion with stock restoration.

use super::common::*;
use farda_core::{OrderStatus, PaymentMethod};
use farda_store::{NewOrder, NewOrderLine, StoreError};

pub async fn run_all_tests(ctx: &TestContext) {
    test_order_deducts_stock_and_totals(ctx).await;
    test_insufficient_stock_rejected(ctx).await;
    test_empty_order_rejected(ctx).await;
    test_cancel_restores_stock_once(ctx).await;
    test_delete_restores_stock(ctx).await;
    test_delivered_stamps_date(ctx).await;
}

fn order_for(
    client_id: i64,
    school_id: i64,
    lines: Vec<NewOrderLine>,
) -> NewOrder {
    NewOrder {
        client_id,
        school_id,
        expected_delivery: None,
        payment_method: PaymentMethod::Pix,
        notes: None,
        seller_id: None,
        lines,
    }
}

pub async fn test_order_deducts_stock_and_totals(ctx: &TestContext) {
    println!("  🧪 test_order_deducts_stock_and_totals");

    let school = ctx.new_school("Escola Totais").await;
    let client = ctx.new_client("Ana Lima").await;
    let shirt = ctx.new_product("Totais Shirt", school.id, 25.0, 20).await;
    let jacket = ctx.new_product("Totais Jacket", school.id, 80.0, 8).await;

    let order = ctx
        .orders()
        .create(
            order_for(
                client.id,
                school.id,
                vec![
                    NewOrderLine { product_id: shirt.id, quantity: 3 },
                    NewOrderLine { product_id: jacket.id, quantity: 2 },
                ],
            ),
            Some("tester"),
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_quantity, 5);
    assert!((order.total_amount - (3.0 * 25.0 + 2.0 * 80.0)).abs() < 0.001);

    // Stock reduced by exactly the ordered quantities.
    assert_eq!(ctx.products().get(shirt.id).await.unwrap().stock, 17);
    assert_eq!(ctx.products().get(jacket.id).await.unwrap().stock, 6);

    // Line subtotals sum to the order total.
    let lines = ctx.orders().lines(order.id).await.unwrap();
    let sum: f64 = lines.iter().map(|l| l.item.subtotal).sum();
    assert!((sum - order.total_amount).abs() < 0.001);

    // Order-driven movements landed in the ledger.
    let movements = ctx.stock().movements_for_product(shirt.id, 10).await.unwrap();
    assert_eq!(movements[0].delta, -3);
    assert!(movements[0].reason.contains(&format!("order #{}", order.id)));

    println!("     ✓ Stock deducted, totals consistent, movements recorded");
}

pub async fn test_insufficient_stock_rejected(ctx: &TestContext) {
    println!("  🧪 test_insufficient_stock_rejected");

    let school = ctx.new_school("Escola Escassez").await;
    let client = ctx.new_client("Bruno Reis").await;
    let scarce = ctx.new_product("Scarce Cap", school.id, 15.0, 2).await;

    let err = ctx
        .orders()
        .create(
            order_for(
                client.id,
                school.id,
                vec![NewOrderLine { product_id: scarce.id, quantity: 3 }],
            ),
            Some("tester"),
        )
        .await
        .unwrap_err();

    match err {
        StoreError::InsufficientStock { product, available, requested } => {
            assert_eq!(product, "Scarce Cap");
            assert_eq!(available, 2);
            assert_eq!(requested, 3);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Nothing was written: stock untouched, no order rows.
    assert_eq!(ctx.products().get(scarce.id).await.unwrap().stock, 2);

    println!("     ✓ Oversell rejected with product and quantities named");
}

pub async fn test_empty_order_rejected(ctx: &TestContext) {
    println!("  🧪 test_empty_order_rejected");

    let school = ctx.new_school("Escola Vazia").await;
    let client = ctx.new_client("Carla Dias").await;

    let err = ctx
        .orders()
        .create(order_for(client.id, school.id, vec![]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyOrder));

    println!("     ✓ Order without lines rejected");
}

pub async fn test_cancel_restores_stock_once(ctx: &TestContext) {
    println!("  🧪 test_cancel_restores_stock_once");

    let school = ctx.new_school("Escola Cancelamento").await;
    let client = ctx.new_client("Diego Alves").await;
    let product = ctx.new_product("Cancel Shorts", school.id, 40.0, 10).await;

    let order = ctx
        .orders()
        .create(
            order_for(
                client.id,
                school.id,
                vec![NewOrderLine { product_id: product.id, quantity: 4 }],
            ),
            Some("tester"),
        )
        .await
        .unwrap();
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 6);

    // Cancel: units come back.
    let cancelled = ctx
        .orders()
        .set_status(order.id, OrderStatus::Cancelled, Some("tester"))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 10);

    // A cancelled order cannot be reopened.
    let err = ctx
        .orders()
        .set_status(order.id, OrderStatus::Pending, Some("tester"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::OrderCancelled));

    // Deleting the cancelled order must NOT restore stock a second time.
    ctx.orders().delete(order.id, Some("tester")).await.unwrap();
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 10);

    println!("     ✓ Cancellation restores stock exactly once");
}

pub async fn test_delete_restores_stock(ctx: &TestContext) {
    println!("  🧪 test_delete_restores_stock");

    let school = ctx.new_school("Escola Exclusao").await;
    let client = ctx.new_client("Elisa Prado").await;
    let product = ctx.new_product("Delete Tee", school.id, 20.0, 9).await;

    let order = ctx
        .orders()
        .create(
            order_for(
                client.id,
                school.id,
                vec![NewOrderLine { product_id: product.id, quantity: 5 }],
            ),
            Some("tester"),
        )
        .await
        .unwrap();
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 4);

    ctx.orders().delete(order.id, Some("tester")).await.unwrap();
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 9);

    // Gone for good.
    let err = ctx.orders().get(order.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    let err = ctx.orders().delete(order.id, None).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    println!("     ✓ Deletion restores stock and removes the order");
}

pub async fn test_delivered_stamps_date(ctx: &TestContext) {
    println!("  🧪 test_delivered_stamps_date");

    let school = ctx.new_school("Escola Entrega").await;
    let client = ctx.new_client("Fabio Costa").await;
    let product = ctx.new_product("Deliver Polo", school.id, 35.0, 6).await;

    let order = ctx
        .orders()
        .create(
            order_for(
                client.id,
                school.id,
                vec![NewOrderLine { product_id: product.id, quantity: 1 }],
            ),
            Some("tester"),
        )
        .await
        .unwrap();
    assert!(order.delivered_at.is_none());

    let delivered = ctx
        .orders()
        .set_status(order.id, OrderStatus::Delivered, Some("tester"))
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_at.is_some());

    // Delivered orders keep their stock deduction.
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 5);

    println!("     ✓ Delivery date stamped, stock stays deducted");
}

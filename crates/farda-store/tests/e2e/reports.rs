//! Report aggregation tests. The container is shared with earlier modules,
//! so assertions work on deltas and per-school slices, not absolute totals.

use super::common::*;
use farda_core::{OrderStatus, PaymentMethod};
use farda_store::{NewOrder, NewOrderLine};

pub async fn run_all_tests(ctx: &TestContext) {
    test_overview_tracks_new_activity(ctx).await;
    test_status_distribution_covers_all_statuses(ctx).await;
    test_per_school_metrics(ctx).await;
    test_sales_by_school_counts_delivered_only(ctx).await;
}

pub async fn test_overview_tracks_new_activity(ctx: &TestContext) {
    println!("  🧪 test_overview_tracks_new_activity");

    let before = ctx.reports().overview().await.unwrap();

    let school = ctx.new_school("Escola Overview").await;
    let client = ctx.new_client("Gisele Nunes").await;
    let product = ctx.new_product("Overview Polo", school.id, 50.0, 20).await;

    ctx.orders()
        .create(
            NewOrder {
                client_id: client.id,
                school_id: school.id,
                expected_delivery: None,
                payment_method: PaymentMethod::Cash,
                notes: None,
                seller_id: None,
                lines: vec![NewOrderLine { product_id: product.id, quantity: 2 }],
            },
            None,
        )
        .await
        .unwrap();

    let after = ctx.reports().overview().await.unwrap();
    assert_eq!(after.total_orders, before.total_orders + 1);
    assert_eq!(after.pending_orders, before.pending_orders + 1);
    assert_eq!(after.total_clients, before.total_clients + 1);

    println!("     ✓ Overview counters follow new orders and clients");
}

pub async fn test_status_distribution_covers_all_statuses(ctx: &TestContext) {
    println!("  🧪 test_status_distribution_covers_all_statuses");

    let counts = ctx.reports().orders_by_status().await.unwrap();
    assert_eq!(counts.len(), OrderStatus::ALL.len());
    for status in OrderStatus::ALL {
        assert!(
            counts.iter().any(|(s, _)| s == status),
            "status {status:?} missing from distribution"
        );
    }
    let pending = counts
        .iter()
        .find(|(s, _)| *s == OrderStatus::Pending)
        .map(|(_, n)| *n)
        .unwrap_or(0);
    assert!(pending >= 1);

    println!("     ✓ Every status present, pending count plausible");
}

pub async fn test_per_school_metrics(ctx: &TestContext) {
    println!("  🧪 test_per_school_metrics");

    let school = ctx.new_school("Escola Metricas").await;
    let client = ctx.new_client("Helena Braga").await;
    // min_stock is 5, so stock 4 is already a restock alert.
    let low = ctx.new_product("Metricas Low", school.id, 22.0, 4).await;
    let _ok = ctx.new_product("Metricas Ok", school.id, 22.0, 50).await;

    ctx.orders()
        .create(
            NewOrder {
                client_id: client.id,
                school_id: school.id,
                expected_delivery: None,
                payment_method: PaymentMethod::Transfer,
                notes: None,
                seller_id: None,
                lines: vec![NewOrderLine { product_id: low.id, quantity: 1 }],
            },
            None,
        )
        .await
        .unwrap();

    let metrics = ctx.reports().per_school().await.unwrap();
    let entry = metrics
        .iter()
        .find(|m| m.school_id == school.id)
        .expect("school should appear in per-school metrics");

    assert_eq!(entry.school_name, "Escola Metricas");
    assert_eq!(entry.orders, 1);
    assert_eq!(entry.pending_orders, 1);
    assert_eq!(entry.products, 2);
    assert_eq!(entry.low_stock_products, 1);

    println!("     ✓ Per-school roll-up isolates the school's numbers");
}

pub async fn test_sales_by_school_counts_delivered_only(ctx: &TestContext) {
    println!("  🧪 test_sales_by_school_counts_delivered_only");

    let school = ctx.new_school("Escola Receita").await;
    let client = ctx.new_client("Igor Matos").await;
    let product = ctx.new_product("Receita Polo", school.id, 100.0, 10).await;

    let make_order = |qty: i64| NewOrder {
        client_id: client.id,
        school_id: school.id,
        expected_delivery: None,
        payment_method: PaymentMethod::CreditCard,
        notes: None,
        seller_id: None,
        lines: vec![NewOrderLine { product_id: product.id, quantity: qty }],
    };

    let delivered = ctx.orders().create(make_order(2), None).await.unwrap();
    let _pending = ctx.orders().create(make_order(1), None).await.unwrap();

    ctx.orders()
        .set_status(delivered.id, OrderStatus::Delivered, None)
        .await
        .unwrap();

    let sales = ctx.reports().sales_by_school().await.unwrap();
    let entry = sales
        .iter()
        .find(|s| s.school_name == "Escola Receita")
        .expect("school should appear in the revenue ranking");

    assert_eq!(entry.delivered_orders, 1);
    assert!((entry.delivered_sales - 200.0).abs() < 0.001);

    println!("     ✓ Only delivered orders count as revenue");
}

//! Manual stock adjustment tests.

use super::common::*;
use farda_store::StoreError;

pub async fn run_all_tests(ctx: &TestContext) {
    test_adjustment_applies_exact_delta(ctx).await;
    test_adjustment_below_zero_rejected(ctx).await;
    test_adjustment_requires_reason(ctx).await;
    test_recent_movements_include_product(ctx).await;
}

pub async fn test_adjustment_applies_exact_delta(ctx: &TestContext) {
    println!("  🧪 test_adjustment_applies_exact_delta");

    let school = ctx.new_school("Escola Ajuste").await;
    let product = ctx.new_product("Adjust Polo", school.id, 30.0, 10).await;

    let after_in = ctx
        .stock()
        .adjust(product.id, 7, "received shipment", Some("admin"))
        .await
        .unwrap();
    assert_eq!(after_in.stock, 17);

    let after_out = ctx
        .stock()
        .adjust(product.id, -4, "damaged in storage", Some("admin"))
        .await
        .unwrap();
    assert_eq!(after_out.stock, 13);

    let movements = ctx.stock().movements_for_product(product.id, 10).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].delta, -4);
    assert_eq!(movements[0].reason, "damaged in storage");
    assert_eq!(movements[0].recorded_by.as_deref(), Some("admin"));
    assert_eq!(movements[1].delta, 7);

    println!("     ✓ Stock changed by exactly the delta, ledger kept");
}

pub async fn test_adjustment_below_zero_rejected(ctx: &TestContext) {
    println!("  🧪 test_adjustment_below_zero_rejected");

    let school = ctx.new_school("Escola Negativa").await;
    let product = ctx.new_product("Negative Cap", school.id, 12.0, 3).await;

    let err = ctx
        .stock()
        .adjust(product.id, -5, "typo", Some("admin"))
        .await
        .unwrap_err();
    match err {
        StoreError::StockWouldGoNegative { stock, delta, .. } => {
            assert_eq!(stock, 3);
            assert_eq!(delta, -5);
        }
        other => panic!("expected StockWouldGoNegative, got {other:?}"),
    }

    // Level and ledger untouched.
    assert_eq!(ctx.products().get(product.id).await.unwrap().stock, 3);
    assert!(ctx.stock().movements_for_product(product.id, 10).await.unwrap().is_empty());

    println!("     ✓ Negative result rejected, nothing recorded");
}

pub async fn test_adjustment_requires_reason(ctx: &TestContext) {
    println!("  🧪 test_adjustment_requires_reason");

    let school = ctx.new_school("Escola Motivo").await;
    let product = ctx.new_product("Reason Tee", school.id, 18.0, 5).await;

    let err = ctx.stock().adjust(product.id, 1, "  ", None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let err = ctx.stock().adjust(product.id, 0, "no-op", None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    println!("     ✓ Blank reason and zero delta rejected");
}

pub async fn test_recent_movements_include_product(ctx: &TestContext) {
    println!("  🧪 test_recent_movements_include_product");

    let school = ctx.new_school("Escola Ledger").await;
    let product = ctx.new_product("Ledger Jacket", school.id, 90.0, 2).await;

    ctx.stock()
        .adjust(product.id, 3, "inventory recount", Some("admin"))
        .await
        .unwrap();

    let recent = ctx.stock().recent_movements(5).await.unwrap();
    let entry = recent
        .iter()
        .find(|m| m.movement.product_id == product.id)
        .expect("movement should be in the recent ledger");
    assert_eq!(entry.product_name, "Ledger Jacket");
    assert_eq!(entry.movement.delta, 3);

    println!("     ✓ Ledger rows carry the product name");
}

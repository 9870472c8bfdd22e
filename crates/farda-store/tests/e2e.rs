//! End-to-end tests using a Docker PostgreSQL container.
//!
//! Test modules are organized by aggregate:
//! - `clients` - registration, listing, delete protection
//! - `orders` - placement, stock deduction, totals, cancellation, deletion
//! - `stock` - manual adjustments and the movement ledger
//! - `users` - accounts, login, password rules, bootstrap
//! - `reports` - dashboard metrics and per-school roll-ups
//!
//! Run with:
//!   cargo test -p farda-store --test e2e -- --nocapture --test-threads=1
//!
//! Requirements:
//!   - Docker must be running
//!   - Port 5434 must be available (non-standard port to avoid conflicts)

// Test modules (located in e2e/ subdirectory)
#[path = "e2e/common/mod.rs"]
mod common;

#[path = "e2e/clients.rs"]
mod clients;

#[path = "e2e/orders.rs"]
mod orders;

#[path = "e2e/reports.rs"]
mod reports;

#[path = "e2e/stock.rs"]
mod stock;

#[path = "e2e/users.rs"]
mod users;

use common::TestContext;

/// Run all E2E tests sequentially to share the Docker container.
#[tokio::test]
async fn e2e_all_tests() {
    println!("\n🚀 Starting farda-store End-to-End Tests\n");

    let ctx = match TestContext::setup().await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("❌ Failed to setup test context: {}", e);
            eprintln!("   Make sure Docker is running and port 5434 is available");
            return;
        }
    };

    println!("\n📋 Running test modules...\n");

    clients::run_all_tests(&ctx).await;
    orders::run_all_tests(&ctx).await;
    stock::run_all_tests(&ctx).await;
    users::run_all_tests(&ctx).await;
    reports::run_all_tests(&ctx).await;

    println!("\n🎉 All E2E test modules passed!\n");
}

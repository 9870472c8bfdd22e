//! User account tests: creation, login, password rules, bootstrap.

use super::common::*;
use farda_core::{Role, SeedConfig};
use farda_store::{NewUser, StoreError};

pub async fn run_all_tests(ctx: &TestContext) {
    test_create_and_login(ctx).await;
    test_weak_password_rejected(ctx).await;
    test_duplicate_username_rejected(ctx).await;
    test_change_password(ctx).await;
    test_bootstrap_accounts(ctx).await;
}

pub async fn test_create_and_login(ctx: &TestContext) {
    println!("  🧪 test_create_and_login");

    let user = ctx
        .users()
        .create(NewUser {
            username: "carlos".to_string(),
            password: "Vendas123".to_string(),
            display_name: "Carlos Mota".to_string(),
            role: Role::Vendor,
        })
        .await
        .unwrap();
    assert_eq!(user.role, Role::Vendor);
    assert!(user.password_hash.starts_with("$argon2"));

    let logged_in = ctx.users().verify_login("carlos", "Vendas123").await.unwrap();
    assert_eq!(logged_in.username, "carlos");

    let err = ctx.users().verify_login("carlos", "wrong").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));

    let err = ctx.users().verify_login("nobody", "Vendas123").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));

    println!("     ✓ Login verified against argon2 hash");
}

pub async fn test_weak_password_rejected(ctx: &TestContext) {
    println!("  🧪 test_weak_password_rejected");

    let err = ctx
        .users()
        .create(NewUser {
            username: "weakpw".to_string(),
            password: "short".to_string(),
            display_name: "Weak".to_string(),
            role: Role::Vendor,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::WeakPassword(_)));

    println!("     ✓ Weak password rejected before hashing");
}

pub async fn test_duplicate_username_rejected(ctx: &TestContext) {
    println!("  🧪 test_duplicate_username_rejected");

    let new_user = |username: &str| NewUser {
        username: username.to_string(),
        password: "Senha123A".to_string(),
        display_name: "Dup".to_string(),
        role: Role::Vendor,
    };

    ctx.users().create(new_user("duplicated")).await.unwrap();
    let err = ctx.users().create(new_user("duplicated")).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));

    println!("     ✓ Duplicate username reported as such");
}

pub async fn test_change_password(ctx: &TestContext) {
    println!("  🧪 test_change_password");

    ctx.users()
        .create(NewUser {
            username: "mutavel".to_string(),
            password: "Antiga123".to_string(),
            display_name: "Mutavel".to_string(),
            role: Role::Vendor,
        })
        .await
        .unwrap();

    // Wrong current password is refused.
    let err = ctx
        .users()
        .change_password("mutavel", "errada", "Nova1234")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));

    ctx.users()
        .change_password("mutavel", "Antiga123", "Nova1234")
        .await
        .unwrap();

    ctx.users().verify_login("mutavel", "Nova1234").await.unwrap();
    let err = ctx.users().verify_login("mutavel", "Antiga123").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));

    println!("     ✓ Password rotated, old one dead");
}

pub async fn test_bootstrap_accounts(ctx: &TestContext) {
    println!("  🧪 test_bootstrap_accounts");

    // The users table is not empty at this point (earlier tests created
    // accounts), so bootstrap must refuse to run.
    // SAFETY: test controls its own environment
    unsafe {
        std::env::set_var("FARDA_TEST_ADMIN_PW", "Administrador1");
        std::env::set_var("FARDA_TEST_VENDOR_PW", "Vendedor123");
    }

    let seed = SeedConfig {
        admin_username: "boot-admin".to_string(),
        admin_password_env: "FARDA_TEST_ADMIN_PW".to_string(),
        vendor_username: "boot-vendor".to_string(),
        vendor_password_env: "FARDA_TEST_VENDOR_PW".to_string(),
        schools: Vec::new(),
    };

    let created = ctx.users().bootstrap(&seed).await.unwrap();
    assert!(!created, "bootstrap must be a no-op on a populated table");

    // SAFETY: cleanup in test
    unsafe {
        std::env::remove_var("FARDA_TEST_ADMIN_PW");
        std::env::remove_var("FARDA_TEST_VENDOR_PW");
    }

    println!("     ✓ Bootstrap is a no-op once users exist");
}

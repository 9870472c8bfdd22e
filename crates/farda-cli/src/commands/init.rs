//! Init command: create the schema and seed bootstrap data.
//!
//! `farda init` is idempotent: the schema uses IF NOT EXISTS throughout, and
//! seeding only happens on empty tables.

use farda_core::FardaConfig;
use farda_store::{SchoolStore, UserStore, connect, ensure_schema};

pub async fn run(config: &FardaConfig) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    ensure_schema(&pool).await?;
    println!("Schema ensured.");

    let schools = SchoolStore::new(pool.clone());
    let seeded_schools = schools.seed_defaults(&config.seed.schools).await?;
    if seeded_schools > 0 {
        println!("Seeded {seeded_schools} school(s).");
    }

    let users = UserStore::new(pool);
    if users.bootstrap(&config.seed).await? {
        println!(
            "Created bootstrap accounts '{}' (admin) and '{}' (vendor).",
            config.seed.admin_username, config.seed.vendor_username
        );
    } else {
        println!("Users already present, bootstrap skipped.");
    }

    Ok(())
}

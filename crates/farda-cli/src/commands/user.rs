//! User management from the terminal.

use farda_core::{FardaConfig, Role};
use farda_store::{NewUser, UserStore, connect, ensure_schema};

pub async fn add(
    config: &FardaConfig,
    username: &str,
    password: &str,
    display_name: &str,
    role: &str,
) -> anyhow::Result<()> {
    let role = Role::parse(role)
        .ok_or_else(|| anyhow::anyhow!("unknown role '{role}' (expected admin or vendor)"))?;

    let pool = connect(&config.database).await?;
    ensure_schema(&pool).await?;

    let users = UserStore::new(pool);
    let user = users
        .create(NewUser {
            username: username.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
            role,
        })
        .await?;

    println!("Created user '{}' ({})", user.username, user.role);
    Ok(())
}

pub async fn list(config: &FardaConfig) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    let users = UserStore::new(pool);

    let all = users.list().await?;
    if all.is_empty() {
        println!("No users. Run `farda init` to create the bootstrap accounts.");
        return Ok(());
    }

    println!("Users ({}):", all.len());
    for user in all {
        let status = if user.active { "active" } else { "inactive" };
        println!(
            "  - {:<20} {:<24} role={:<6} {}",
            user.username, user.display_name, user.role, status
        );
    }
    Ok(())
}

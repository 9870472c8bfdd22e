//! User accounts: creation, login verification, password changes, bootstrap.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use farda_core::{Role, SeedConfig, User};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{StoreError, is_unique_violation};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

/// Store for user accounts.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user. The password must pass the strength rules.
    pub async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        validate_password(&new.password)?;
        let hash = hash_password(&new.password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, display_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, display_name, role, active, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&hash)
        .bind(&new.display_name)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(format!("user '{}'", new.username))
            } else {
                StoreError::Database(e)
            }
        })?;

        user_from_row(&row)
    }

    /// List all users, ordered by username.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password_hash, display_name, role, active, created_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    /// Find an active user by username.
    pub async fn find_active(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, display_name, role, active, created_at
            FROM users
            WHERE username = $1 AND active
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Verify a login attempt. Returns the user on success.
    pub async fn verify_login(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let user = self
            .find_active(username)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;
        Ok(user)
    }

    /// Change a user's password after verifying the current one.
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        let user = self
            .find_active(username)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;

        verify_password(current_password, &user.password_hash)?;
        validate_password(new_password)?;

        let hash = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(&hash)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// On an empty users table, create the bootstrap admin and vendor
    /// accounts with passwords taken from the configured env vars.
    ///
    /// Returns true when accounts were created.
    pub async fn bootstrap(&self, seed: &SeedConfig) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(false);
        }

        let admin_password = require_env_password(&seed.admin_password_env)?;
        let vendor_password = require_env_password(&seed.vendor_password_env)?;

        self.create(NewUser {
            username: seed.admin_username.clone(),
            password: admin_password,
            display_name: "Administrator".to_string(),
            role: Role::Admin,
        })
        .await?;

        self.create(NewUser {
            username: seed.vendor_username.clone(),
            password: vendor_password,
            display_name: "Vendor".to_string(),
            role: Role::Vendor,
        })
        .await?;

        tracing::warn!(
            admin = %seed.admin_username,
            vendor = %seed.vendor_username,
            "bootstrapped dashboard accounts (passwords taken from env)"
        );
        Ok(true)
    }
}

fn require_env_password(env_var: &str) -> Result<String, StoreError> {
    match std::env::var(env_var) {
        Ok(password) if !password.trim().is_empty() => Ok(password),
        _ => Err(StoreError::InvalidInput(format!(
            "bootstrap password env var '{env_var}' is not set"
        ))),
    }
}

/// Password strength rules: at least 8 characters with an uppercase letter,
/// a lowercase letter, and a digit.
pub fn validate_password(password: &str) -> Result<(), StoreError> {
    if password.chars().count() < 8 {
        return Err(StoreError::WeakPassword(
            "must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(StoreError::WeakPassword(
            "must contain an uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(StoreError::WeakPassword(
            "must contain a lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(StoreError::WeakPassword(
            "must contain a digit".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<(), StoreError> {
    let parsed = PasswordHash::new(hash).map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| StoreError::InvalidCredentials)
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let role_str: String = row.try_get("role")?;
    let role = Role::parse(&role_str).ok_or(StoreError::InvalidStoredValue {
        column: "users.role",
        value: role_str,
    })?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        display_name: row.try_get("display_name")?,
        role,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Admin2024x").is_ok());
        assert!(matches!(
            validate_password("short1A"),
            Err(StoreError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password("alllowercase1"),
            Err(StoreError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password("ALLUPPERCASE1"),
            Err(StoreError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password("NoDigitsHere"),
            Err(StoreError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Vendas123x").unwrap();
        assert!(hash.starts_with("$argon2"));
        verify_password("Vendas123x", &hash).unwrap();
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(StoreError::InvalidCredentials)
        ));
    }
}

//! User registration and login.
//!
//! Emails are trimmed and lower-cased before storage and lookup. Passwords
//! are stored as hex HMAC-SHA256 keyed by a random per-user salt and checked
//! in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

type HmacSha256 = Hmac<Sha256>;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account. Returns the stored user.
pub async fn register(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AccountError> {
    let name = name.trim();
    let email = normalize_email(email);
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AccountError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::PasswordTooShort);
    }

    if find_user(pool, &email).await?.is_some() {
        return Err(AccountError::EmailTaken);
    }

    let salt = Uuid::new_v4().to_string();
    let password_hash = hash_password(&salt, password);
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, salt, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .bind(&salt)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        // lost a race with a concurrent registration
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            AccountError::EmailTaken
        } else {
            AccountError::Database(e)
        }
    })?;

    Ok(User {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        email,
    })
}

/// Verify credentials and return the matching user.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<User, AccountError> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AccountError::MissingFields);
    }

    let row = sqlx::query("SELECT id, name, email, password_hash, salt FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    let salt: String = row.get("salt");
    let stored: String = row.get("password_hash");
    if !verify_password(&salt, password, &stored) {
        return Err(AccountError::InvalidCredentials);
    }

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
    })
}

/// Look up a user by (normalized) email.
pub async fn find_user(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, email FROM users WHERE email = ?")
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
    }))
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn verify_password(salt: &str, password: &str, stored_hex: &str) -> bool {
    let Ok(expected) = hex::decode(stored_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

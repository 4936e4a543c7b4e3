//! Per-user analysis history.
//!
//! Each analysis performed on behalf of a registered email stores a short
//! preview of the input with the Flesch reading ease and Gunning fog scores.
//! Listing returns the newest entries first.

use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::accounts::{find_user, normalize_email};
use crate::models::HistoryEntry;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Email is required")]
    MissingEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// First `chars` characters of `text`, with `...` appended when truncated.
pub fn make_preview(text: &str, chars: usize) -> String {
    let mut iter = text.chars();
    let head: String = iter.by_ref().take(chars).collect();
    if iter.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Store one history row for the user registered under `email`.
///
/// Returns `Ok(false)` when no such user exists.
pub async fn record_analysis(
    pool: &SqlitePool,
    email: &str,
    preview: &str,
    flesch: f64,
    fog: f64,
) -> Result<bool, HistoryError> {
    if email.trim().is_empty() {
        return Err(HistoryError::MissingEmail);
    }
    let Some(user) = find_user(pool, email).await? else {
        return Ok(false);
    };

    sqlx::query(
        "INSERT INTO analysis_history (user_id, text_preview, flesch_score, fog_score, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(preview)
    .bind(flesch)
    .bind(fog)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;

    Ok(true)
}

/// All history rows for `email`, newest first. Unknown emails yield an empty list.
pub async fn list_history(pool: &SqlitePool, email: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(HistoryError::MissingEmail);
    }

    let rows = sqlx::query(
        r#"
        SELECT h.id, h.user_id, h.text_preview, h.flesch_score, h.fog_score, h.created_at
        FROM analysis_history h
        JOIN users u ON u.id = h.user_id
        WHERE u.email = ?
        ORDER BY h.created_at DESC, h.id DESC
        "#,
    )
    .bind(&email)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| HistoryEntry {
            id: row.get("id"),
            user_id: row.get("user_id"),
            text_preview: row.get("text_preview"),
            flesch_score: row.get("flesch_score"),
            fog_score: row.get("fog_score"),
            created_at: row.get("created_at"),
        })
        .collect())
}

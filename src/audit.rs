//! Change-log attached to records by composition: every mutation writes an
//! audit entry with the actor, an action code and a JSON detail payload.

use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: String,
    pub created_at: String,
}

const SELECT_AUDIT: &str = "SELECT e.id, e.user_id, \
            COALESCE(u.username, 'unknown') AS username, \
            e.action, e.target_type, e.target_id, e.details, e.created_at \
     FROM audit_log e \
     LEFT JOIN users u ON u.id = e.user_id";

/// Record an audit entry. Callers treat failures as non-fatal
/// (`let _ = audit::log(...)`): losing a log line never aborts the write
/// it describes.
pub async fn log(
    pool: &SqlitePool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO audit_log (user_id, action, target_type, target_id, details) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details.to_string())
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// History of a single record, newest first.
pub async fn find_for_target(
    pool: &SqlitePool,
    target_type: &str,
    target_id: i64,
    limit: i64,
) -> Result<Vec<AuditEntry>, AppError> {
    let sql = format!(
        "{SELECT_AUDIT} WHERE e.target_type = ? AND e.target_id = ? \
         ORDER BY e.id DESC LIMIT ?"
    );
    let entries = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(target_type)
        .bind(target_id)
        .bind(limit.clamp(1, 500))
        .fetch_all(pool)
        .await?;
    Ok(entries)
}

/// The N most recent entries across all targets.
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let sql = format!("{SELECT_AUDIT} ORDER BY e.id DESC LIMIT ?");
    let entries = sqlx::query_as::<_, AuditEntry>(&sql)
        .bind(limit.clamp(1, 500))
        .fetch_all(pool)
        .await?;
    Ok(entries)
}

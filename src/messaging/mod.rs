//! Record-thread messaging: every notification is a message attached to a
//! suggestion, optionally addressed to specific users via recipient rows.

pub mod queries;

use sqlx::SqlitePool;

use crate::errors::AppError;

/// Post a message to a suggestion's thread and fan out one recipient row per
/// addressed user. An empty recipient list is a plain thread entry (visible
/// on the record, addressed to nobody). Returns the message id.
pub async fn post_message(
    pool: &SqlitePool,
    suggestion_id: i64,
    author_id: Option<i64>,
    subject: &str,
    body: &str,
    recipients: &[i64],
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO messages (suggestion_id, author_id, subject, body) VALUES (?, ?, ?, ?)",
    )
    .bind(suggestion_id)
    .bind(author_id)
    .bind(subject)
    .bind(body)
    .execute(pool)
    .await?;
    let message_id = result.last_insert_rowid();

    for &user_id in recipients {
        sqlx::query("INSERT INTO message_recipients (message_id, user_id) VALUES (?, ?)")
            .bind(message_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    Ok(message_id)
}

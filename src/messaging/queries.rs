use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;

/// A message in a suggestion's thread.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageItem {
    pub id: i64,
    pub suggestion_id: i64,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub subject: String,
    pub body: String,
    pub recipient_count: i64,
    pub created_at: String,
}

/// A message as seen from a recipient's inbox.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InboxItem {
    pub recipient_id: i64,
    pub message_id: i64,
    pub suggestion_id: i64,
    pub suggestion_title: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Page of inbox items.
#[derive(Debug, Serialize)]
pub struct InboxPage {
    pub items: Vec<InboxItem>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Full thread for a suggestion, oldest first.
pub async fn find_for_suggestion(
    pool: &SqlitePool,
    suggestion_id: i64,
) -> Result<Vec<MessageItem>, AppError> {
    let items = sqlx::query_as::<_, MessageItem>(
        "SELECT m.id, m.suggestion_id, m.author_id, u.display_name AS author_name, \
                m.subject, m.body, \
                (SELECT COUNT(*) FROM message_recipients mr WHERE mr.message_id = m.id) \
                    AS recipient_count, \
                m.created_at \
         FROM messages m \
         LEFT JOIN users u ON u.id = m.author_id \
         WHERE m.suggestion_id = ? \
         ORDER BY m.id",
    )
    .bind(suggestion_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Paginated inbox for a user, unread first then newest.
pub async fn find_for_user(
    pool: &SqlitePool,
    user_id: i64,
    page: i64,
    per_page: i64,
) -> Result<InboxPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let total_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM message_recipients mr WHERE mr.user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    let total_pages = ((total_count as f64) / (per_page as f64)).ceil().max(1.0) as i64;

    let items = sqlx::query_as::<_, InboxItem>(
        "SELECT mr.id AS recipient_id, m.id AS message_id, m.suggestion_id, \
                s.title AS suggestion_title, m.subject, m.body, mr.is_read, m.created_at \
         FROM message_recipients mr \
         JOIN messages m ON m.id = mr.message_id \
         JOIN suggestions s ON s.id = m.suggestion_id \
         WHERE mr.user_id = ? \
         ORDER BY mr.is_read, m.id DESC \
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(InboxPage { items, page, per_page, total_count, total_pages })
}

pub async fn count_unread(pool: &SqlitePool, user_id: i64) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM message_recipients WHERE user_id = ? AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Mark one of the user's own inbox entries as read.
pub async fn mark_read(pool: &SqlitePool, user_id: i64, recipient_id: i64) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE message_recipients \
         SET is_read = 1, read_at = strftime('%Y-%m-%dT%H:%M:%S', 'now') \
         WHERE id = ? AND user_id = ?",
    )
    .bind(recipient_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

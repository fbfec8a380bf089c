use sqlx::SqlitePool;

use crate::errors::AppError;
use super::types::{NewUser, User, UserDisplay};

const SELECT_USER: &str = "SELECT id, username, password, email, display_name, permissions, \
                                  is_active, created_at, updated_at \
                           FROM users";

const SELECT_USER_DISPLAY: &str = "SELECT id, username, email, display_name, permissions, \
                                          is_active, created_at, updated_at \
                                   FROM users";

/// Create a new user, returning its id.
pub async fn create(pool: &SqlitePool, new: &NewUser) -> Result<i64, AppError> {
    if new.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required.".to_string()));
    }
    if new.display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name is required.".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO users (username, password, email, display_name, permissions) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(new.username.trim())
    .bind(&new.password)
    .bind(new.email.trim())
    .bind(new.display_name.trim())
    .bind(&new.permissions)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Look up a user (with password hash) for authentication.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let sql = format!("{SELECT_USER} WHERE username = ? AND is_active = 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_display_by_id(pool: &SqlitePool, id: i64) -> Result<Option<UserDisplay>, AppError> {
    let sql = format!("{SELECT_USER_DISPLAY} WHERE id = ?");
    let user = sqlx::query_as::<_, UserDisplay>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// All active users, for assignee pickers.
pub async fn find_all_display(pool: &SqlitePool) -> Result<Vec<UserDisplay>, AppError> {
    let sql = format!("{SELECT_USER_DISPLAY} WHERE is_active = 1 ORDER BY display_name, id");
    let users = sqlx::query_as::<_, UserDisplay>(&sql).fetch_all(pool).await?;
    Ok(users)
}

/// Display name of a user, for notification bodies. Errors if unknown.
pub async fn display_name(pool: &SqlitePool, id: i64) -> Result<String, AppError> {
    let name: Option<String> = sqlx::query_scalar("SELECT display_name FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    name.ok_or(AppError::NotFound)
}

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::audit;
use crate::errors::AppError;
use crate::messaging;
use crate::models::user;
use super::types::*;

const SELECT_SUGGESTION: &str = "SELECT s.id, s.title, s.description, \
            s.author_id, a.display_name AS author_name, \
            s.assignee_id, r.display_name AS assignee_name, \
            s.created_on, s.processed_on, s.status, s.priority, s.category, \
            s.comment, s.benefit, s.cost, s.active, s.created_at, s.updated_at \
     FROM suggestions s \
     JOIN users a ON a.id = s.author_id \
     LEFT JOIN users r ON r.id = s.assignee_id";

fn validate(
    title: &str,
    description: &str,
    cost: f64,
    created_on: NaiveDate,
    processed_on: Option<NaiveDate>,
) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required.".to_string()));
    }
    if description.trim().is_empty() {
        return Err(AppError::Validation("Description is required.".to_string()));
    }
    if cost < 0.0 {
        return Err(AppError::Validation(
            "Estimated cost cannot be negative.".to_string(),
        ));
    }
    if let Some(processed) = processed_on {
        if processed < created_on {
            return Err(AppError::Validation(
                "Processing date cannot be earlier than the creation date.".to_string(),
            ));
        }
    }
    Ok(())
}

async fn require_user(pool: &SqlitePool, id: i64) -> Result<String, AppError> {
    user::display_name(pool, id)
        .await
        .map_err(|_| AppError::Validation("Unknown assignee.".to_string()))
}

/// Create a suggestion authored by `author_id`, posting the creation notice
/// to the record thread. Returns the new id.
pub async fn create(pool: &SqlitePool, author_id: i64, new: &NewSuggestion) -> Result<i64, AppError> {
    let created_on = Utc::now().date_naive();
    validate(&new.title, &new.description, new.cost, created_on, None)?;
    if let Some(assignee_id) = new.assignee_id {
        require_user(pool, assignee_id).await?;
    }

    let result = sqlx::query(
        "INSERT INTO suggestions \
             (title, description, author_id, assignee_id, created_on, \
              status, priority, category, benefit, cost) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.title.trim())
    .bind(&new.description)
    .bind(author_id)
    .bind(new.assignee_id)
    .bind(created_on)
    .bind(Status::Draft)
    .bind(new.priority)
    .bind(new.category)
    .bind(&new.benefit)
    .bind(new.cost)
    .execute(pool)
    .await?;
    let id = result.last_insert_rowid();

    let author_name = user::display_name(pool, author_id).await?;
    messaging::post_message(
        pool,
        id,
        Some(author_id),
        "New suggestion",
        &format!("New suggestion created by {author_name}"),
        &[],
    )
    .await?;

    let details = serde_json::json!({
        "title": new.title.trim(),
        "summary": format!("Created suggestion '{}'", new.title.trim()),
    });
    let _ = audit::log(pool, author_id, "suggestion.created", "suggestion", id, details).await;

    Ok(id)
}

/// Generic write path. Applies the patch, re-validates the record, and fires
/// the notification hook. Author and creation date are never touched.
///
/// The hook fires on any write containing the matching fields, whether or not
/// the stored value actually changed: an assignee write notifies the new
/// assignee, a status write of accepted/refused notifies the author. The
/// workflow actions funnel through here, so an accept performed via
/// `workflow::accept` produces exactly one "accepted" message.
pub async fn update(
    pool: &SqlitePool,
    actor_id: i64,
    id: i64,
    patch: &SuggestionPatch,
) -> Result<(), AppError> {
    let current = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let title = patch.title.clone().unwrap_or(current.title);
    let description = patch.description.clone().unwrap_or(current.description);
    let assignee_id = match patch.assignee_id {
        Some(value) => value,
        None => current.assignee_id,
    };
    let processed_on = match patch.processed_on {
        Some(value) => value,
        None => current.processed_on,
    };
    let status = patch.status.unwrap_or(current.status);
    let priority = patch.priority.unwrap_or(current.priority);
    let category = patch.category.unwrap_or(current.category);
    let comment = patch.comment.clone().or(current.comment);
    let benefit = patch.benefit.clone().or(current.benefit);
    let cost = patch.cost.unwrap_or(current.cost);
    let active = patch.active.unwrap_or(current.active);

    validate(&title, &description, cost, current.created_on, processed_on)?;

    let assignee_name = match patch.assignee_id {
        Some(Some(assignee_id)) => Some(require_user(pool, assignee_id).await?),
        _ => None,
    };

    sqlx::query(
        "UPDATE suggestions SET \
             title = ?, description = ?, assignee_id = ?, processed_on = ?, \
             status = ?, priority = ?, category = ?, comment = ?, benefit = ?, \
             cost = ?, active = ?, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S', 'now') \
         WHERE id = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(assignee_id)
    .bind(processed_on)
    .bind(status)
    .bind(priority)
    .bind(category)
    .bind(&comment)
    .bind(&benefit)
    .bind(cost)
    .bind(active)
    .bind(id)
    .execute(pool)
    .await?;

    if let (Some(Some(assignee_id)), Some(name)) = (patch.assignee_id, assignee_name) {
        messaging::post_message(
            pool,
            id,
            Some(actor_id),
            "New assignment",
            &format!("Assigned to {name}"),
            &[assignee_id],
        )
        .await?;
    }
    if patch.status == Some(Status::Accepted) {
        messaging::post_message(
            pool,
            id,
            Some(actor_id),
            "Suggestion accepted",
            "Suggestion accepted",
            &[current.author_id],
        )
        .await?;
    }
    if patch.status == Some(Status::Refused) {
        messaging::post_message(
            pool,
            id,
            Some(actor_id),
            "Suggestion refused",
            "Suggestion refused",
            &[current.author_id],
        )
        .await?;
    }

    let details = serde_json::json!({
        "changed": patch.changed_fields(),
        "summary": format!("Updated suggestion '{title}'"),
    });
    let _ = audit::log(pool, actor_id, "suggestion.updated", "suggestion", id, details).await;

    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Suggestion>, AppError> {
    let sql = format!("{SELECT_SUGGESTION} WHERE s.id = ?");
    let row = sqlx::query_as::<_, Suggestion>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Paginated list with name search and caller filters.
///
/// A search term matches the title OR the author's display name
/// (case-insensitive partial match); the caller filters are ANDed on top.
pub async fn find_paginated(
    pool: &SqlitePool,
    q: Option<&str>,
    filter: &SuggestionFilter,
    page: i64,
    per_page: i64,
) -> Result<SuggestionPage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut clauses: Vec<&str> = Vec::new();
    if !filter.include_inactive {
        clauses.push("s.active = 1");
    }
    let pattern = q
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));
    if pattern.is_some() {
        clauses.push("(s.title LIKE ? OR a.display_name LIKE ?)");
    }
    if filter.status.is_some() {
        clauses.push("s.status = ?");
    }
    if filter.category.is_some() {
        clauses.push("s.category = ?");
    }
    if filter.priority.is_some() {
        clauses.push("s.priority = ?");
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let count_sql =
        format!("SELECT COUNT(*) FROM suggestions s JOIN users a ON a.id = s.author_id{where_clause}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(p) = &pattern {
        count_query = count_query.bind(p.clone()).bind(p.clone());
    }
    if let Some(status) = filter.status {
        count_query = count_query.bind(status);
    }
    if let Some(category) = filter.category {
        count_query = count_query.bind(category);
    }
    if let Some(priority) = filter.priority {
        count_query = count_query.bind(priority);
    }
    let total_count = count_query.fetch_one(pool).await?;
    let total_pages = ((total_count as f64) / (per_page as f64)).ceil().max(1.0) as i64;

    let sql = format!(
        "{SELECT_SUGGESTION}{where_clause} \
         ORDER BY s.created_on DESC, s.id DESC LIMIT ? OFFSET ?"
    );
    let mut query = sqlx::query_as::<_, Suggestion>(&sql);
    if let Some(p) = &pattern {
        query = query.bind(p.clone()).bind(p.clone());
    }
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(category) = filter.category {
        query = query.bind(category);
    }
    if let Some(priority) = filter.priority {
        query = query.bind(priority);
    }
    let rows = query.bind(per_page).bind(offset).fetch_all(pool).await?;

    Ok(SuggestionPage {
        items: rows.into_iter().map(SuggestionView::from).collect(),
        page,
        per_page,
        total_count,
        total_pages,
    })
}

/// Soft delete: records are archived, never removed.
pub async fn soft_delete(pool: &SqlitePool, actor_id: i64, id: i64) -> Result<(), AppError> {
    let current = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    sqlx::query(
        "UPDATE suggestions SET active = 0, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%S', 'now') \
         WHERE id = ?",
    )
    .bind(id)
    .execute(pool)
    .await?;

    let details = serde_json::json!({
        "summary": format!("Archived suggestion '{}'", current.title),
    });
    let _ = audit::log(pool, actor_id, "suggestion.archived", "suggestion", id, details).await;

    Ok(())
}

/// Counts of active suggestions grouped by status and by category.
pub async fn stats(pool: &SqlitePool) -> Result<SuggestionStats, AppError> {
    let by_status = sqlx::query_as::<_, GroupCount>(
        "SELECT status AS key, COUNT(*) AS count FROM suggestions \
         WHERE active = 1 GROUP BY status ORDER BY count DESC, key",
    )
    .fetch_all(pool)
    .await?;

    let by_category = sqlx::query_as::<_, GroupCount>(
        "SELECT category AS key, COUNT(*) AS count FROM suggestions \
         WHERE active = 1 GROUP BY category ORDER BY count DESC, key",
    )
    .fetch_all(pool)
    .await?;

    Ok(SuggestionStats { by_status, by_category })
}

//! Workflow actions over batches of suggestions.
//!
//! Every action walks its batch in order and funnels each write through
//! [`queries::update`], so the notification hook fires once per matching
//! write. A failed precondition aborts the call at that record; records
//! earlier in the batch stay written (the surrounding transaction boundary,
//! if any, belongs to the caller). No action checks the current status
//! before transitioning.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use super::queries;
use super::types::{Status, SuggestionPatch};

/// draft → submitted. Requires a non-empty description.
pub async fn submit(pool: &SqlitePool, actor_id: i64, ids: &[i64]) -> Result<(), AppError> {
    for &id in ids {
        let record = queries::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
        if record.description.trim().is_empty() {
            return Err(AppError::Validation(
                "Fill in the description before submitting.".to_string(),
            ));
        }
        let patch = SuggestionPatch {
            status: Some(Status::Submitted),
            ..Default::default()
        };
        queries::update(pool, actor_id, id, &patch).await?;
    }
    Ok(())
}

/// → under_review.
pub async fn analyze(pool: &SqlitePool, actor_id: i64, ids: &[i64]) -> Result<(), AppError> {
    for &id in ids {
        let patch = SuggestionPatch {
            status: Some(Status::UnderReview),
            ..Default::default()
        };
        queries::update(pool, actor_id, id, &patch).await?;
    }
    Ok(())
}

/// → accepted. Requires an assignee; stamps the processing date and
/// notifies the author (via the write hook).
pub async fn accept(pool: &SqlitePool, actor_id: i64, ids: &[i64]) -> Result<(), AppError> {
    for &id in ids {
        let record = queries::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
        if record.assignee_id.is_none() {
            return Err(AppError::Validation(
                "Assign a responsible user before accepting.".to_string(),
            ));
        }
        let patch = SuggestionPatch {
            status: Some(Status::Accepted),
            processed_on: Some(Some(Utc::now().date_naive())),
            ..Default::default()
        };
        queries::update(pool, actor_id, id, &patch).await?;
    }
    Ok(())
}

/// → refused. Requires a processing comment stating the reason; stamps the
/// processing date and notifies the author (via the write hook).
pub async fn refuse(pool: &SqlitePool, actor_id: i64, ids: &[i64]) -> Result<(), AppError> {
    for &id in ids {
        let record = queries::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
        if !record.has_comment() {
            return Err(AppError::Validation(
                "State the refusal reason in the processing comment before refusing.".to_string(),
            ));
        }
        let patch = SuggestionPatch {
            status: Some(Status::Refused),
            processed_on: Some(Some(Utc::now().date_naive())),
            ..Default::default()
        };
        queries::update(pool, actor_id, id, &patch).await?;
    }
    Ok(())
}

/// → realized.
pub async fn realize(pool: &SqlitePool, actor_id: i64, ids: &[i64]) -> Result<(), AppError> {
    for &id in ids {
        let patch = SuggestionPatch {
            status: Some(Status::Realized),
            ..Default::default()
        };
        queries::update(pool, actor_id, id, &patch).await?;
    }
    Ok(())
}

/// → draft, from any state. Clears the processing date.
pub async fn reset_to_draft(pool: &SqlitePool, actor_id: i64, ids: &[i64]) -> Result<(), AppError> {
    for &id in ids {
        let patch = SuggestionPatch {
            status: Some(Status::Draft),
            processed_on: Some(None),
            ..Default::default()
        };
        queries::update(pool, actor_id, id, &patch).await?;
    }
    Ok(())
}

use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::audit;
use crate::auth::session::{require_permission, require_user_id};
use crate::errors::AppError;
use crate::messaging;
use crate::models::suggestion::{
    self, workflow, Category, NewSuggestion, Priority, Status, SuggestionFilter, SuggestionPatch,
    SuggestionView,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

fn parse_filter(query: &ListQuery) -> Result<SuggestionFilter, AppError> {
    let status = query
        .status
        .as_deref()
        .map(Status::from_str)
        .transpose()
        .map_err(AppError::Validation)?;
    let category = query
        .category
        .as_deref()
        .map(Category::from_str)
        .transpose()
        .map_err(AppError::Validation)?;
    let priority = query
        .priority
        .as_deref()
        .map(Priority::from_str)
        .transpose()
        .map_err(AppError::Validation)?;

    Ok(SuggestionFilter {
        status,
        category,
        priority,
        include_inactive: query.include_inactive,
    })
}

/// GET /api/v1/suggestions
pub async fn list(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.view")?;

    let filter = parse_filter(&query)?;
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(25);

    let result =
        suggestion::find_paginated(&pool, query.q.as_deref(), &filter, page, per_page).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/v1/suggestions — the session user becomes the author.
pub async fn create(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<NewSuggestion>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.create")?;
    let author_id = require_user_id(&session)?;

    let id = suggestion::create(&pool, author_id, &body).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Created().json(view))
}

/// GET /api/v1/suggestions/stats
pub async fn stats(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.view")?;

    let stats = suggestion::stats(&pool).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/v1/suggestions/{id}
pub async fn read(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.view")?;

    let view = detail_view(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Request body for the generic write path. Absent fields stay untouched;
/// `assignee_id: null` cannot be expressed here — clearing the assignee is
/// not part of the API surface.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub processed_on: Option<NaiveDate>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub comment: Option<String>,
    pub benefit: Option<String>,
    pub cost: Option<f64>,
    pub active: Option<bool>,
}

impl UpdateRequest {
    fn into_patch(self) -> SuggestionPatch {
        SuggestionPatch {
            title: self.title,
            description: self.description,
            assignee_id: self.assignee_id.map(Some),
            processed_on: self.processed_on.map(Some),
            status: self.status,
            priority: self.priority,
            category: self.category,
            comment: self.comment,
            benefit: self.benefit,
            cost: self.cost,
            active: self.active,
        }
    }
}

/// PUT /api/v1/suggestions/{id} — generic field write. Status is writable
/// here without any workflow guard; the write hook still fires.
pub async fn update(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<UpdateRequest>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.update")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    suggestion::update(&pool, actor_id, id, &body.into_inner().into_patch()).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /api/v1/suggestions/{id} — archive (soft delete).
pub async fn delete(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.delete")?;
    let actor_id = require_user_id(&session)?;

    suggestion::soft_delete(&pool, actor_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// POST /api/v1/suggestions/{id}/submit
pub async fn submit(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.create")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    workflow::submit(&pool, actor_id, &[id]).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/v1/suggestions/{id}/analyze
pub async fn analyze(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.review")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    workflow::analyze(&pool, actor_id, &[id]).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/v1/suggestions/{id}/accept
pub async fn accept(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.review")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    workflow::accept(&pool, actor_id, &[id]).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/v1/suggestions/{id}/refuse
pub async fn refuse(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.review")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    workflow::refuse(&pool, actor_id, &[id]).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/v1/suggestions/{id}/realize
pub async fn realize(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.review")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    workflow::realize(&pool, actor_id, &[id]).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/v1/suggestions/{id}/reset
pub async fn reset(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.review")?;
    let actor_id = require_user_id(&session)?;

    let id = path.into_inner();
    workflow::reset_to_draft(&pool, actor_id, &[id]).await?;
    let view = detail_view(&pool, id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/v1/suggestions/{id}/messages — the record thread.
pub async fn thread(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "suggestion.view")?;

    let id = path.into_inner();
    suggestion::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    let messages = messaging::queries::find_for_suggestion(&pool, id).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// GET /api/v1/suggestions/{id}/history — the record's audit trail.
pub async fn history(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "audit.view")?;

    let id = path.into_inner();
    suggestion::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    let entries = audit::find_for_target(&pool, "suggestion", id, 100).await?;
    Ok(HttpResponse::Ok().json(entries))
}

async fn detail_view(pool: &SqlitePool, id: i64) -> Result<SuggestionView, AppError> {
    let record = suggestion::find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    Ok(SuggestionView::from(record))
}

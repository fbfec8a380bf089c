use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::session::{require_permission, require_user_id};
use crate::errors::AppError;
use crate::messaging::queries;

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// GET /api/v1/messages — the session user's inbox, unread first.
pub async fn inbox(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<InboxQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "messages.view")?;
    let user_id = require_user_id(&session)?;

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(25);
    let result = queries::find_for_user(&pool, user_id, page, per_page).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/v1/messages/unread_count
pub async fn unread_count(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "messages.view")?;
    let user_id = require_user_id(&session)?;

    let count = queries::count_unread(&pool, user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "unread": count })))
}

/// POST /api/v1/messages/{id}/read — mark one of the user's own inbox
/// entries as read. The id is the recipient row id from the inbox listing.
pub async fn mark_read(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "messages.view")?;
    let user_id = require_user_id(&session)?;

    queries::mark_read(&pool, user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::audit;
use crate::auth::session::require_permission;
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/audit — recent audit entries across all targets.
pub async fn list(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<AuditQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "audit.view")?;

    let entries = audit::find_recent(&pool, query.limit.unwrap_or(50)).await?;
    Ok(HttpResponse::Ok().json(entries))
}

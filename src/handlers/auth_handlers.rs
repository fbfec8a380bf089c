use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::password;
use crate::errors::AppError;
use crate::models::user;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /login — authenticate and open a cookie session carrying the user id,
/// username and permission codes.
pub async fn login(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let found = user::find_by_username(&pool, body.username.trim()).await?;

    let Some(u) = found else {
        return Ok(unauthorized());
    };

    match password::verify_password(&body.password, &u.password) {
        Ok(true) => {
            let _ = session.insert("user_id", u.id);
            let _ = session.insert("username", &u.username);
            let _ = session.insert("permissions", &u.permissions);

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "id": u.id,
                "username": u.username,
                "display_name": u.display_name,
                "permissions": u.permissions,
            })))
        }
        _ => Ok(unauthorized()),
    }
}

/// POST /logout — drop the session.
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "Invalid username or password"
    }))
}

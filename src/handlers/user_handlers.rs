use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::audit;
use crate::auth::password;
use crate::auth::session::{require_permission, require_user_id};
use crate::errors::AppError;
use crate::models::user::{self, NewUser, UserForm};

/// GET /api/v1/users — active users, for assignee pickers.
pub async fn list(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_user_id(&session)?;

    let users = user::find_all_display(&pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/v1/users
pub async fn create(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<UserForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "users.manage")?;
    let actor_id = require_user_id(&session)?;

    if body.password.trim().is_empty() {
        return Err(AppError::Validation("Password is required.".to_string()));
    }
    let hashed = password::hash_password(&body.password)
        .map_err(|_| AppError::Hash("Password hash error".to_string()))?;

    let new = NewUser {
        username: body.username.trim().to_string(),
        password: hashed,
        email: body.email.trim().to_string(),
        display_name: body.display_name.trim().to_string(),
        permissions: body.permissions.trim().to_string(),
    };

    match user::create(&pool, &new).await {
        Ok(user_id) => {
            let details = serde_json::json!({
                "email": new.email,
                "summary": format!("Created user '{}'", new.username),
            });
            let _ = audit::log(&pool, actor_id, "user.created", "user", user_id, details).await;

            let created = user::find_display_by_id(&pool, user_id)
                .await?
                .ok_or(AppError::NotFound)?;
            Ok(HttpResponse::Created().json(created))
        }
        Err(AppError::Db(e)) if e.to_string().contains("UNIQUE") => Err(AppError::Validation(
            "Username already exists".to_string(),
        )),
        Err(e) => Err(e),
    }
}

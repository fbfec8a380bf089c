use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Session(String),
    Validation(String),
    PermissionDenied(String),
    Hash(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Validation(e) => write!(f, "{e}"),
            AppError::PermissionDenied(code) => write!(f, "Permission denied: {code}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            AppError::PermissionDenied(code) => HttpResponse::Forbidden()
                .json(serde_json::json!({ "error": format!("Permission denied: {code}") })),
            AppError::Session(_) => HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "Not logged in" })),
            AppError::NotFound => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Internal server error" }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

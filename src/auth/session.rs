use actix_session::Session;
use crate::errors::AppError;

/// Wrapper around permission codes with a `has()` method.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// The session user id, or a session error for anonymous callers.
pub fn require_user_id(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or_else(|| AppError::Session("User not logged in".to_string()))
}

pub fn get_permissions(session: &Session) -> Result<Permissions, String> {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err("No permissions in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

/// Check permission; returns Err(AppError) if denied.
pub fn require_permission(session: &Session, code: &str) -> Result<(), AppError> {
    let permissions = get_permissions(session)
        .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;

    if permissions.has(code) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code.to_string()))
    }
}

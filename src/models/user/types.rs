use serde::{Deserialize, Serialize};

/// Internal user struct for authentication — includes password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub permissions: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Safe version for API responses — no password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserDisplay {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub permissions: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// New user data for creation.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub permissions: String,
}

/// Request body for the user creation endpoint (plaintext password).
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub permissions: String,
}

//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` opens an isolated in-memory SQLite database, runs the
//! migrations, and returns a handle whose pool is pinned to a single
//! connection so the in-memory database lives as long as the pool.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use ideabox::auth::password;
use ideabox::db::MIGRATOR;
use ideabox::models::user::{self, NewUser};

pub struct TestDb {
    pool: SqlitePool,
}

impl TestDb {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

pub async fn setup_test_db() -> TestDb {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open test DB");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    TestDb { pool }
}

/// Create a test user with the given permission CSV, returning its id.
pub async fn create_test_user(pool: &SqlitePool, suffix: &str, permissions: &str) -> i64 {
    user::create(
        pool,
        &NewUser {
            username: format!("user_{suffix}"),
            password: password::hash_password("pass").unwrap(),
            email: format!("{suffix}@test.com"),
            display_name: format!("Test User {suffix}"),
            permissions: permissions.to_string(),
        },
    )
    .await
    .unwrap()
}

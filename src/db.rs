use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::auth::password;
use crate::models::user::{self, NewUser};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the database pool, creating the file if needed.
/// WAL + foreign keys are set on every connection.
pub async fn init_pool(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .expect("Failed to create DB pool")
}

pub async fn run_migrations(pool: &SqlitePool) {
    MIGRATOR.run(pool).await.expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the default admin account if the users table is empty.
pub async fn seed_admin(pool: &SqlitePool, admin_password: &str) {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping admin seed");
        return;
    }

    let hash = password::hash_password(admin_password).expect("Failed to hash admin password");
    let admin = NewUser {
        username: "admin".to_string(),
        password: hash,
        email: "admin@localhost".to_string(),
        display_name: "Administrator".to_string(),
        permissions: user::ALL_PERMISSIONS.join(","),
    };
    user::create(pool, &admin).await.expect("Failed to seed admin user");
    log::info!("Seeded default admin user");
}

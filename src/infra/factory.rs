use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::ports::{AttendeeRepository, EventRepository, UserRepository};
use crate::domain::services::auth_service::JwtAuthProvider;
use crate::infra::repositories::{
    postgres_attendee_repo::PostgresAttendeeRepo, postgres_event_repo::PostgresEventRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_attendee_repo::SqliteAttendeeRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_user_repo::SqliteUserRepo,
};

fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let (event_repo, attendee_repo, user_repo): (
        Arc<dyn EventRepository>,
        Arc<dyn AttendeeRepository>,
        Arc<dyn UserRepository>,
    ) = if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let pool = connect_postgres(database_url).await?;
        sqlx::migrate!("./migrations/postgres").run(&pool).await?;

        (
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresAttendeeRepo::new(pool.clone())),
            Arc::new(PostgresUserRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let pool = connect_sqlite(database_url).await?;
        sqlx::migrate!("./migrations/sqlite").run(&pool).await?;

        (
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteAttendeeRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool)),
        )
    };

    let auth_provider = JwtAuthProvider::new(user_repo, config);
    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        auth_provider.ensure_user(username, password).await?;
    }

    Ok(AppState::new(config.clone(), event_repo, attendee_repo, Arc::new(auth_provider)))
}

async fn connect_postgres(database_url: &str) -> Result<PgPool, AppError> {
    let opts: PgConnectOptions = database_url.parse()
        .map_err(|e| AppError::Config(format!("Invalid Postgres URL: {}", e)))?;
    let opts = opts.log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Config(format!("Invalid SQLite connection string: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::infra::clock::SystemClock;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::domain::models::user::{NewUser, UserRole};
use crate::domain::ports::{Clock, EmailService, UserRepository};
use crate::domain::services::auth_service::hash_password;
use crate::error::AppError;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_catalog_repo::PostgresCatalogRepo,
    postgres_deal_repo::PostgresDealRepo, postgres_payment_repo::PostgresPaymentRepo,
    postgres_room_repo::PostgresRoomRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_catalog_repo::SqliteCatalogRepo,
    sqlite_deal_repo::SqliteDealRepo, sqlite_payment_repo::SqlitePaymentRepo,
    sqlite_room_repo::SqliteRoomRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn sqlite_repositories(pool: &SqlitePool) -> Repositories {
    Repositories {
        users: Arc::new(SqliteUserRepo::new(pool.clone())),
        catalog: Arc::new(SqliteCatalogRepo::new(pool.clone())),
        deals: Arc::new(SqliteDealRepo::new(pool.clone())),
        rooms: Arc::new(SqliteRoomRepo::new(pool.clone())),
        bookings: Arc::new(SqliteBookingRepo::new(pool.clone())),
        payments: Arc::new(SqlitePaymentRepo::new(pool.clone())),
    }
}

pub fn postgres_repositories(pool: &PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepo::new(pool.clone())),
        catalog: Arc::new(PostgresCatalogRepo::new(pool.clone())),
        deals: Arc::new(PostgresDealRepo::new(pool.clone())),
        rooms: Arc::new(PostgresRoomRepo::new(pool.clone())),
        bookings: Arc::new(PostgresBookingRepo::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepo::new(pool.clone())),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service: Arc<dyn EmailService> = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(&pool)
    };

    if let Err(e) = seed_staff_account(config, repos.users.as_ref()).await {
        warn!("Staff account seeding failed: {}", e);
    }

    AppState::new(config.clone(), repos, clock, email_service)
}

// Creates the configured staff login once; later boots find it and leave it alone.
pub async fn seed_staff_account(config: &Config, users: &dyn UserRepository) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.staff_email, &config.staff_password) else {
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    if users.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let new_user = NewUser {
        email: email.clone(),
        full_name: "Front Desk".to_string(),
        password_hash: hash_password(password)?,
        role: UserRole::Staff,
    };
    users.create(&new_user).await?;
    info!("Seeded staff account {}", email);
    Ok(())
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

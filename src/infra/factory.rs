use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::payments::http_payment_gateway::HttpPaymentGateway;
use crate::infra::ai::gemini_service::GeminiService;
use crate::domain::services::auth_service::AuthService;
use crate::infra::repositories::{
    postgres_user_repo::PostgresUserRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_property_repo::PostgresPropertyRepo, postgres_override_repo::PostgresOverrideRepo,
    postgres_booking_repo::PostgresBookingRepo, postgres_payment_repo::PostgresPaymentRepo,
    postgres_notification_repo::PostgresNotificationRepo, postgres_job_repo::PostgresJobRepo,
    postgres_review_repo::PostgresReviewRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_property_repo::SqlitePropertyRepo, sqlite_override_repo::SqliteOverrideRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_payment_repo::SqlitePaymentRepo,
    sqlite_notification_repo::SqliteNotificationRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_review_repo::SqliteReviewRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("booking_requested.html", include_str!("../templates/booking_requested.html"))
        .expect("Failed to load booking_requested template");
    tera.add_raw_template("status_changed.html", include_str!("../templates/status_changed.html"))
        .expect("Failed to load status_changed template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let payment_gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_service_url.clone(),
        config.payment_service_token.clone(),
    ));
    let llm_service = Arc::new(GeminiService::new());
    let templates = Arc::new(load_templates());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
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

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            auth_repo,
            property_repo: Arc::new(PostgresPropertyRepo::new(pool.clone())),
            override_repo: Arc::new(PostgresOverrideRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            payment_repo: Arc::new(PostgresPaymentRepo::new(pool.clone())),
            notification_repo: Arc::new(PostgresNotificationRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            review_repo: Arc::new(PostgresReviewRepo::new(pool.clone())),
            auth_service,
            email_service,
            payment_gateway,
            llm_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
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

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            auth_repo,
            property_repo: Arc::new(SqlitePropertyRepo::new(pool.clone())),
            override_repo: Arc::new(SqliteOverrideRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            review_repo: Arc::new(SqliteReviewRepo::new(pool.clone())),
            auth_service,
            email_service,
            payment_gateway,
            llm_service,
            templates,
        }
    }
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

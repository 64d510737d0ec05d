use culture_cms::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::PostgresRepository,
    revalidate::{HttpRevalidator, LogRevalidator, RevalidatorState},
    storage::{MediaStorage, S3MediaStorage, StorageState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Start-up order: configuration, logging, database (with migrations),
/// storage, revalidation, HTTP server. Shared clients are built once here and
/// handed to every service through `AppState`.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "culture_cms=debug,tower_http=info,axum=trace".into());

    // Pretty logs locally, JSON for the log aggregator in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to apply database migrations.");

    let store = Arc::new(PostgresRepository::new(pool.clone()));

    let media = S3MediaStorage::from_config(&config);

    // MinIO convenience for the dockerized local setup.
    if config.env == Env::Local {
        media.ensure_bucket().await;
    }
    let storage = Arc::new(media) as StorageState;

    let revalidator: RevalidatorState = match &config.revalidate_url {
        Some(url) => Arc::new(HttpRevalidator::new(
            url.clone(),
            config.revalidate_secret.clone(),
        )),
        None => {
            tracing::warn!("REVALIDATE_URL not set; stale pages will only be logged");
            Arc::new(LogRevalidator)
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(store, storage, revalidator, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server terminated with an error");
    }

    tracing::info!("Shutting down; closing database pool");
    pool.close().await;
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! LUKATO billing server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lukato_billing::adapters::{
    app_router, InMemorySubscriptionStore, PaymentAppState, PostgresSubscriptionStore,
};
use lukato_billing::application::{InitiatorSettings, WebhookSettings};
use lukato_billing::config::{AppConfig, ConfigError, DatabaseConfig, LogFormat, ValidationError};
use lukato_billing::ports::SubscriptionStore;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config)?;
    config.validate()?;

    if !config.payment.has_secret_key() {
        tracing::warn!(
            "LUKATO__PAYMENT__SECRET_KEY is not set; payment callbacks will be answered with 500"
        );
    }

    let store = subscription_store(&config.database).await?;

    let prices = config.payment.price_table()?;

    let state = PaymentAppState {
        subscription_store: store,
        webhook_settings: WebhookSettings {
            secret_key: config.payment.secret_key.clone(),
            renewal_policy: config.payment.renewal_policy,
            prices,
            store_timeout: config.server.webhook_store_timeout(),
        },
        initiator_settings: InitiatorSettings {
            merchant_id: config.payment.merchant_id.clone(),
            prices,
        },
    };

    let app = app_router(config.server.request_timeout())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        renewal_policy = ?config.payment.renewal_policy,
        "LUKATO billing server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `RUST_LOG` overrides the configured filter.
fn init_tracing(config: &AppConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .map_err(|e| StartupError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.server.log_format() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

async fn subscription_store(
    config: &DatabaseConfig,
) -> Result<Arc<dyn SubscriptionStore>, StartupError> {
    let Some(url) = config.url() else {
        tracing::warn!("No database configured; subscriptions are kept in memory");
        return Ok(Arc::new(InMemorySubscriptionStore::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresSubscriptionStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

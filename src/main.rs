//! CropScan Backend Server
//!
//! Simulated crop disease scanner with session-scoped scan history.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CROPSCAN SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Validator +  │  │  Classifier         │ │
//! │  │  (Axum)   │─▶│  Rate Limiter │─▶│  (simulated)        │ │
//! │  └─────┬─────┘  └───────┬───────┘  └──────────┬──────────┘ │
//! │        └────────────────┼─────────────────────┘            │
//! │                         ▼                                   │
//! │                ┌─────────────────┐                          │
//! │                │  History Store  │  PostgreSQL | memory     │
//! │                └─────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod middleware;
mod error;
mod logic;
mod store;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::sync::Arc;

pub use error::{AppError, AppResult};

use config::{Config, StoreBackend};
use logic::classifier::ClassifierRules;
use logic::RateLimiter;
use store::{HistoryStore, MemoryHistoryStore, PgHistoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing();

    tracing::info!("CropScan Server starting ({})...", config.environment);

    let store: Arc<dyn HistoryStore> = match config.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

            let pool = db::create_pool(&config.database_url, config.db_max_connections)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(PgHistoryStore::new(pool))
        }
        StoreBackend::Memory => {
            if config.is_production() {
                tracing::warn!("In-memory history store in production: scans are lost on restart");
            }
            Arc::new(MemoryHistoryStore::new())
        }
    };

    // Build application state
    let state = AppState::new(config.clone(), store);

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cropscan_server=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HistoryStore>,
    pub limiter: RateLimiter,
    pub classifier: ClassifierRules,
    pub config: Config,
    pub store_kind: &'static str,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn HistoryStore>) -> Self {
        let store_kind = match config.store_backend {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        };

        Self {
            store,
            limiter: RateLimiter::new(config.rate_limit_max, config.rate_limit_window_secs),
            classifier: ClassifierRules::default(),
            config,
            store_kind,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/classify", post(handlers::classify::classify))
        .route("/history", get(handlers::history::list))
        .route("/history/clear", post(handlers::history::clear))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Answers every OPTIONS request with an empty 200
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

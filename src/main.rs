//! Dataset Hub Backend Server
//!
//! Mirrors public dataset metadata from an external catalog, manages user
//! accounts and follow relationships, and scores the impact of combining
//! datasets.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     DATASET HUB                        │
//! ├────────────────────────────────────────────────────────┤
//! │  ┌──────────┐  ┌──────────┐  ┌───────────────────────┐ │
//! │  │  API     │  │  Auth    │  │  Impact Assessor      │ │
//! │  │  (Axum)  │  │  (JWT)   │  │  (naive / advanced)   │ │
//! │  └────┬─────┘  └────┬─────┘  └──────────┬────────────┘ │
//! │       └─────────────┼────────────────────┘             │
//! │                     ▼                                  │
//! │       ┌─────────────┐   ┌──────────────────┐           │
//! │       │ PostgreSQL  │   │ External Catalog │           │
//! │       └─────────────┘   └──────────────────┘           │
//! └────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod db;
mod error;
mod handlers;
mod impact;
mod middleware;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use catalog::CatalogClient;
use impact::{EmbedderConfig, ImpactAssessor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dataset_hub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Dataset Hub server starting...");
    tracing::info!(
        "Database: {}",
        config.database_url.split('@').last().unwrap_or("***")
    );
    tracing::info!("Catalog: {}", config.catalog_base_url);

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    // External catalog client
    let catalog = CatalogClient::new(&config.catalog_base_url, config.catalog_api_token.clone());

    // Impact assessor owns the embedding model; the model itself is loaded
    // lazily on the first advanced assessment.
    let assessor = Arc::new(ImpactAssessor::new(EmbedderConfig {
        model_path: config.embedding_model_path.clone(),
        tokenizer_path: config.embedding_tokenizer_path.clone(),
    }));

    // Build application state
    let state = AppState {
        pool,
        config: config.clone(),
        catalog,
        assessor,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
    pub catalog: CatalogClient,
    pub assessor: Arc<ImpactAssessor>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/datasets", get(handlers::datasets::list))
        // Catalog ids contain slashes, so detail uses a wildcard segment
        .route(
            "/api/v1/datasets/detail/*catalog_id",
            get(handlers::datasets::get),
        );

    // User routes (bearer JWT auth)
    let user_routes = Router::new()
        .route("/api/v1/profile", get(handlers::auth::profile))
        .route(
            "/api/v1/datasets/:id/history",
            get(handlers::datasets::history),
        )
        .route(
            "/api/v1/datasets/:id/follow",
            post(handlers::datasets::follow),
        )
        .route(
            "/api/v1/datasets/:id/unfollow",
            post(handlers::datasets::unfollow),
        )
        .route(
            "/api/v1/user/followed-datasets",
            get(handlers::datasets::followed),
        )
        .route(
            "/api/v1/combined-datasets",
            get(handlers::combined::list).post(handlers::combined::create),
        )
        .route(
            "/api/v1/combined-datasets/:id",
            get(handlers::combined::get).delete(handlers::combined::remove),
        )
        .route("/api/v1/impact-assessment", post(handlers::impact::assess))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! Server setup and initialization
//!
//! Provides the application builder, backend selection, and server runner.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use reaction_cache::{RedisPool, RedisReactionBackend};
use reaction_common::{AppConfig, AppError, BackendKind, JwtService};
use reaction_db::{create_pool, run_migrations, PgReactionBackend};
use reaction_service::{MemoryReactionBackend, ReactionService, ReactionStore, RetryPolicy};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let timeout = Duration::from_secs(config.reaction.request_timeout_secs);

    let api = apply_middleware_with_config(
        create_router(),
        timeout,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes(), timeout);

    api.merge(health).with_state(state)
}

/// Build the reaction service for the configured backend
pub async fn create_reaction_service(
    config: &AppConfig,
) -> Result<Arc<dyn ReactionService>, AppError> {
    let retry = RetryPolicy::from_config(&config.reaction);

    let service: Arc<dyn ReactionService> = match config.backend {
        BackendKind::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;

            info!("Connecting to PostgreSQL...");
            let db_config = reaction_db::DatabaseConfig::from(db);
            let pool = create_pool(&db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            let backend = PgReactionBackend::new(pool, db_config.lock_timeout);
            Arc::new(ReactionStore::with_retry(backend, retry))
        }
        BackendKind::Redis => {
            let redis = config
                .redis
                .as_ref()
                .ok_or_else(|| AppError::Config("REDIS_URL is not set".to_string()))?;

            info!("Connecting to Redis...");
            let pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
            pool.health_check()
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
            info!("Redis connection established");

            Arc::new(ReactionStore::with_retry(RedisReactionBackend::new(pool), retry))
        }
        BackendKind::Memory => {
            info!("Using in-memory reaction backend");
            Arc::new(ReactionStore::with_retry(MemoryReactionBackend::new(), retry))
        }
    };

    Ok(service)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let reactions = create_reaction_service(&config).await?;
    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret));

    Ok(AppState::new(reactions, jwt_service, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, &addr).await
}

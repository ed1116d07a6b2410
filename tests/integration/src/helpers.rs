//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers on a chosen backend,
//! seeding posts, and making HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reaction_api::{create_app, AppState};
use reaction_cache::{RedisPool, RedisReactionBackend};
use reaction_common::{AppConfig, BackendKind, JwtService};
use reaction_core::{ItemId, UserId};
use reaction_db::{create_pool, run_migrations, PgReactionBackend};
use reaction_service::{MemoryReactionBackend, ReactionService, ReactionStore, RetryPolicy};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{access_token, ReactRequest, TEST_JWT_SECRET};

/// Handle used to create posts directly in the backing store
#[derive(Clone)]
pub enum PostSeeder {
    Memory(MemoryReactionBackend),
    Postgres(PgReactionBackend),
    Redis(RedisReactionBackend),
}

impl PostSeeder {
    /// Create a post with zeroed counters
    pub async fn create_post(&self) -> Result<ItemId> {
        Ok(match self {
            Self::Memory(backend) => backend.create_item(),
            Self::Postgres(backend) => backend.create_item("integration test post").await?,
            Self::Redis(backend) => backend.create_item().await?,
        })
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub posts: PostSeeder,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the in-memory backend
    pub async fn start() -> Result<Self> {
        Self::start_with_backend(BackendKind::Memory).await
    }

    /// Start a server on the given backend.
    ///
    /// Postgres and Redis read their URLs from `DATABASE_URL` / `REDIS_URL`.
    pub async fn start_with_backend(backend: BackendKind) -> Result<Self> {
        Self::start_with_config(test_config(backend, &[])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let (reactions, posts) = build_backend(&config).await?;
        let state = AppState::new(reactions, Arc::new(JwtService::new(&config.jwt.secret)), config);
        let app = create_app(state);

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            posts,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with an Authorization header value
    pub async fn get_auth(&self, path: &str, authorization: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header("Authorization", authorization)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with an Authorization header value
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        authorization: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Authorization", authorization)
            .json(body)
            .send()
            .await?)
    }

    /// React to a post as `user_id` with a bearer token
    pub async fn react(&self, user_id: UserId, post: ItemId, request: &ReactRequest) -> Result<Response> {
        self.post_auth(
            &format!("/api/v1/posts/{post}/react"),
            &bearer(&access_token(user_id)),
            request,
        )
        .await
    }

    /// Read a post's counters as `user_id`
    pub async fn reactions(&self, user_id: UserId, post: ItemId) -> Result<Response> {
        self.get_auth(
            &format!("/api/v1/posts/{post}/reactions"),
            &bearer(&access_token(user_id)),
        )
        .await
    }
}

/// `Bearer <token>` header value
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

async fn build_backend(config: &AppConfig) -> Result<(Arc<dyn ReactionService>, PostSeeder)> {
    let retry = RetryPolicy::from_config(&config.reaction);

    Ok(match config.backend {
        BackendKind::Memory => {
            let backend = MemoryReactionBackend::new();
            (
                Arc::new(ReactionStore::with_retry(backend.clone(), retry)),
                PostSeeder::Memory(backend),
            )
        }
        BackendKind::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not set"))?;
            let db_config = reaction_db::DatabaseConfig::from(db);
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;
            let backend = PgReactionBackend::new(pool, db_config.lock_timeout);
            (
                Arc::new(ReactionStore::with_retry(backend.clone(), retry)),
                PostSeeder::Postgres(backend),
            )
        }
        BackendKind::Redis => {
            let redis = config
                .redis
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("REDIS_URL not set"))?;
            let backend = RedisReactionBackend::new(RedisPool::from_config(redis)?);
            (
                Arc::new(ReactionStore::with_retry(backend.clone(), retry)),
                PostSeeder::Redis(backend),
            )
        }
    })
}

/// Create a test configuration for a backend.
///
/// Values come from `overrides`, then the environment, then test defaults
/// with a retry budget generous enough for the concurrency tests.
pub fn test_config(backend: BackendKind, overrides: &[(&str, &str)]) -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let backend_name = match backend {
        BackendKind::Postgres => "postgres",
        BackendKind::Redis => "redis",
        BackendKind::Memory => "memory",
    };
    let defaults = [
        ("REACTION_BACKEND", backend_name),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("REACTION_MAX_ATTEMPTS", "200"),
        ("REACTION_INITIAL_BACKOFF_MS", "1"),
        ("REACTION_MAX_BACKOFF_MS", "20"),
    ];

    let lookup = |key: &str| {
        // Backend and secret are fixed so tokens match and the right store is used
        if matches!(key, "REACTION_BACKEND" | "JWT_SECRET") {
            return find(&defaults[..], key);
        }
        find(overrides, key)
            .or_else(|| std::env::var(key).ok())
            .or_else(|| find(&defaults[..], key))
    };

    AppConfig::from_lookup(lookup).map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

fn find(pairs: &[(&str, &str)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| (*v).to_string())
}

/// Whether the environment provides the backend's server
pub fn backend_available(backend: BackendKind) -> bool {
    let var = match backend {
        BackendKind::Memory => return true,
        BackendKind::Postgres => "DATABASE_URL",
        BackendKind::Redis => "REDIS_URL",
    };

    if std::env::var(var).is_err() {
        eprintln!("Skipping test: {var} not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

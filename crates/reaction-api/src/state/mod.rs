//! Application state
//!
//! Holds the shared state for the Axum application: the reaction service
//! behind its object-safe trait, the token validator, and configuration.

use std::sync::Arc;

use reaction_common::{AppConfig, JwtService};
use reaction_service::ReactionService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    reactions: Arc<dyn ReactionService>,
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        reactions: Arc<dyn ReactionService>,
        jwt_service: Arc<JwtService>,
        config: AppConfig,
    ) -> Self {
        Self {
            reactions,
            jwt_service,
            config: Arc::new(config),
        }
    }

    /// Reaction service for the configured backend
    pub fn reactions(&self) -> &dyn ReactionService {
        self.reactions.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.reactions.backend_name())
            .field("jwt_service", &self.jwt_service)
            .field("config", &"AppConfig")
            .finish()
    }
}

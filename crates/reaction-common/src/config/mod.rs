//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BackendKind, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, ReactionConfig, RedisConfig, ServerConfig,
};

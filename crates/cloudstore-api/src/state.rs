//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use cloudstore_auth::JwtDecoder;
use cloudstore_core::config::AppConfig;
use cloudstore_database::DatabasePool;
use cloudstore_service::Services;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent when running on the in-memory driver
    pub db_pool: Option<DatabasePool>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Use cases
    pub services: Services,
}

impl AppState {
    /// Assembles state from its parts.
    pub fn new(config: AppConfig, services: Services, db_pool: Option<DatabasePool>) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        Self {
            config: Arc::new(config),
            db_pool,
            jwt_decoder,
            services,
        }
    }
}

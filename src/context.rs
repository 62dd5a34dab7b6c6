/// Application context and dependency injection
use crate::{
    account::AccountManager,
    config::ServerConfig,
    db,
    error::{ApiError, ApiResult},
    movies::MovieStore,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
///
/// Built once at startup and handed to every handler through axum state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub movie_store: Arc<MovieStore>,
    pub account_manager: Arc<AccountManager>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        // Validate configuration
        config.validate()?;

        // Create data directory if it doesn't exist
        tokio::fs::create_dir_all(&config.storage.data_directory)
            .await
            .map_err(|e| {
                ApiError::Internal(format!(
                    "Failed to create directory {:?}: {}",
                    config.storage.data_directory, e
                ))
            })?;

        let pool = if config.storage.database_path.as_os_str() == db::MEMORY_DATABASE {
            tracing::warn!("Using an in-memory database; data is lost on shutdown");
            db::create_memory_pool().await?
        } else {
            let options = db::DatabaseOptions {
                max_connections: config.storage.max_connections,
                ..Default::default()
            };
            db::create_pool(&config.storage.database_path, options).await?
        };

        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        tracing::info!("Database ready at {:?}", config.storage.database_path);

        Ok(Self::with_pool(config, pool))
    }

    /// Wire services over an already migrated pool
    pub fn with_pool(config: ServerConfig, db: SqlitePool) -> Self {
        let config = Arc::new(config);

        Self {
            movie_store: Arc::new(MovieStore::new(db.clone())),
            account_manager: Arc::new(AccountManager::new(db, Arc::clone(&config))),
            config,
        }
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}

/// Account manager: registration, login and identity lookup
use crate::{
    account::{store::USERNAME_TAKEN, PasswordStorage, UserStore},
    auth,
    config::ServerConfig,
    db::models::User,
    error::{ApiError, ApiResult},
};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Account manager service
pub struct AccountManager {
    users: UserStore,
    passwords: PasswordStorage,
    config: Arc<ServerConfig>,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(db: SqlitePool, config: Arc<ServerConfig>) -> Self {
        Self {
            users: UserStore::new(db),
            passwords: PasswordStorage::from_config(&config.authentication),
            config,
        }
    }

    /// Register a new user
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<User> {
        // Reject a taken name before hashing
        if self.users.find_by_username(username).await?.is_some() {
            tracing::info!("register: username {:?} already taken", username);
            return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let sealed = self.passwords.seal(password)?;
        let user = self.users.create(username, &sealed).await?;

        tracing::info!("register: created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                tracing::warn!("login: unknown username {:?}", username);
                return Err(invalid());
            }
        };

        if !self.passwords.matches(password, &user.password) {
            tracing::warn!("login: wrong password for user {}", user.id);
            return Err(invalid());
        }

        let token = self.issue_access_token(user.id)?;
        tracing::info!("login: issued access token for user {}", user.id);
        Ok(token)
    }

    /// Sign an access token bound to `user_id`
    pub fn issue_access_token(&self, user_id: i64) -> ApiResult<String> {
        let settings = &self.config.authentication;
        auth::encode_access_token(
            user_id,
            &settings.jwt_secret,
            Utc::now(),
            Duration::seconds(settings.access_token_ttl),
        )
    }

    /// Look up the user an access token resolved to
    pub async fn get_user(&self, user_id: i64) -> ApiResult<User> {
        self.users.get_by_id(user_id).await
    }
}

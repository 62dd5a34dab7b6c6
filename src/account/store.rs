/// Credential store backed by the users table
use crate::{
    db::models::User,
    error::{ApiError, ApiResult},
};
use sqlx::SqlitePool;

pub const USERNAME_TAKEN: &str = "Username already exists";

/// Credential store
#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> ApiResult<User> {
        sqlx::query_as::<_, User>("SELECT id, username, password FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Insert a user; `password` is stored exactly as given
    pub async fn create(&self, username: &str, password: &str) -> ApiResult<User> {
        if self.find_by_username(username).await?.is_some() {
            return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
        }

        // The UNIQUE index settles a race between two registrations
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?1, ?2)")
            .bind(username)
            .bind(password)
            .execute(&self.db)
            .await
            .map_err(|e| {
                if ApiError::is_unique_violation(&e) {
                    ApiError::Conflict(USERNAME_TAKEN.to_string())
                } else {
                    ApiError::Database(e)
                }
            })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

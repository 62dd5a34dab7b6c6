/// Password storage policy
use crate::{
    config::{AuthConfig, PasswordStorageMode},
    error::{ApiError, ApiResult},
};

/// How a submitted password is sealed for storage and later checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStorage {
    /// Verbatim storage and plain equality. Anyone who can read the users
    /// table (or call `/get_user` with a valid token) sees the password.
    Plaintext,
    Bcrypt { cost: u32 },
}

impl PasswordStorage {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.password_storage {
            PasswordStorageMode::Plaintext => PasswordStorage::Plaintext,
            PasswordStorageMode::Bcrypt => PasswordStorage::Bcrypt {
                cost: config.bcrypt_cost,
            },
        }
    }

    /// Value to persist for `password`
    pub fn seal(&self, password: &str) -> ApiResult<String> {
        match self {
            PasswordStorage::Plaintext => Ok(password.to_string()),
            PasswordStorage::Bcrypt { cost } => bcrypt::hash(password, *cost)
                .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e))),
        }
    }

    /// Check a submitted password against the stored value
    pub fn matches(&self, password: &str, stored: &str) -> bool {
        match self {
            PasswordStorage::Plaintext => password == stored,
            // A row written under plaintext mode is not a hash and cannot match
            PasswordStorage::Bcrypt { .. } => bcrypt::verify(password, stored).unwrap_or_else(|e| {
                tracing::warn!("Stored password is not a bcrypt hash: {}", e);
                false
            }),
        }
    }
}

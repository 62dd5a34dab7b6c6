/// Account management system
///
/// Handles user registration, credential checks and access-token issuance.

mod manager;
mod password;
mod store;

pub use manager::AccountManager;
pub use password::PasswordStorage;
pub use store::UserStore;

use serde::{Deserialize, Serialize};

/// Registration and login request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

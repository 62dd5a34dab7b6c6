/// API routes and handlers
pub mod account;
pub mod middleware;
pub mod movies;

use crate::context::AppContext;
use axum::Router;
use serde::{Deserialize, Serialize};

/// Acknowledgement body for writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(movies::routes())
        .merge(account::routes())
}

/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    http::{header, Method, StatusCode},
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

const INDEX_HTML: &str = r#"
<h1>Welcome to the Movie API</h1>
<p>This is a RESTful API for managing and retrieving information about movies.</p>
<p>Use the following endpoints to interact with the API:</p>
<ul>
    <li>GET /movies - Retrieve a list of all movies</li>
    <li>POST /movies - Add a new movie (requires a bearer token)</li>
    <li>GET /movies/&lt;id&gt; - Retrieve details of a specific movie by ID</li>
    <li>PUT /movies/&lt;id&gt; - Update a specific movie by ID (requires a bearer token)</li>
    <li>DELETE /movies/&lt;id&gt; - Delete a specific movie by ID (requires a bearer token)</li>
    <li>POST /register - Create a user from a username and password</li>
    <li>POST /login - Exchange a username and password for an access token</li>
    <li>GET /get_user - Show the user owning the bearer token</li>
</ul>
"#;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .fallback(not_found)
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Static page describing the endpoints
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ApiResult<()> {
    let addr = ctx.bind_address();

    info!("Movie API listening on {}", addr);

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

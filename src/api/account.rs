/// Registration, login and identity endpoints
use crate::{
    account::{CredentialsRequest, LoginResponse},
    api::MessageResponse,
    auth::AuthUser,
    context::AppContext,
    db::models::User,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

/// Build account routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/get_user", get(get_user))
}

fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(String, String)> {
    let Json(req) = payload?;
    let username = req.username.ok_or(ApiError::MissingField("username"))?;
    let password = req.password.ok_or(ApiError::MissingField("password"))?;
    Ok((username, password))
}

/// Register endpoint
async fn register(
    State(ctx): State<AppContext>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let (username, password) = credentials(payload)?;

    ctx.account_manager.register(&username, &password).await?;

    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let (username, password) = credentials(payload)?;

    let access_token = ctx.account_manager.login(&username, &password).await?;

    Ok(Json(LoginResponse { access_token }))
}

/// Return the user the bearer token belongs to
async fn get_user(State(ctx): State<AppContext>, auth: AuthUser) -> ApiResult<Json<User>> {
    let user = ctx.account_manager.get_user(auth.user_id).await?;
    Ok(Json(user))
}

/// Movie endpoints
use crate::{
    api::MessageResponse,
    auth::AuthUser,
    context::AppContext,
    db::models::Movie,
    error::ApiResult,
    movies::{MovieListResponse, MovieRequest},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

/// Build movie routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/movies", get(list_movies).post(add_movie))
        .route(
            "/movies/:id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

/// List every movie
async fn list_movies(State(ctx): State<AppContext>) -> ApiResult<Json<MovieListResponse>> {
    let movies = ctx.movie_store.list_all().await?;
    Ok(Json(MovieListResponse { movies }))
}

/// Fetch one movie by id
async fn get_movie(
    State(ctx): State<AppContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Movie>> {
    let Path(id) = id?;
    let movie = ctx.movie_store.get_by_id(id).await?;
    Ok(Json(movie))
}

/// Add a movie
async fn add_movie(
    State(ctx): State<AppContext>,
    auth: AuthUser,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(req) = payload?;
    let fields = req.into_fields()?;

    let movie = ctx.movie_store.create(fields).await?;
    tracing::info!("add_movie: user {} added movie {}", auth.user_id, movie.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Movie added successfully")),
    ))
}

/// Replace all fields of a movie
async fn update_movie(
    State(ctx): State<AppContext>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let fields = req.into_fields()?;

    ctx.movie_store.update(id, fields).await?;
    tracing::info!("update_movie: user {} updated movie {}", auth.user_id, id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Movie updated successfully")),
    ))
}

/// Delete a movie; survivors are renumbered
async fn delete_movie(
    State(ctx): State<AppContext>,
    auth: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Path(id) = id?;

    ctx.movie_store.delete(id).await?;
    tracing::info!("delete_movie: user {} deleted movie {}", auth.user_id, id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Movie deleted successfully")),
    ))
}

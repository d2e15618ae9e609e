//! Routes for the movie catalog.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use movies_core::movie::Movie;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Page size used when `limit` is absent or not a number.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page size a caller may request.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Query parameters for GET /movies.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Maximum number of movies to return. Non-numeric values are ignored.
    pub limit: Option<String>,
}

/// Request body for POST /movies. Missing fields fall through to validation.
#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    /// Movie title.
    #[serde(default)]
    pub title: String,
    /// Release year.
    #[serde(default)]
    pub year: i32,
}

/// A movie as returned by the API.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    /// Public identifier.
    pub id: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i32,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            year: movie.year,
        }
    }
}

/// Resolves the requested page size: default 50, clamped to `[1, 200]`.
fn effective_limit(raw: Option<&str>) -> usize {
    let limit = raw
        .and_then(|s| s.parse::<i64>().ok())
        .map_or(DEFAULT_LIST_LIMIT, |v| v.clamp(1, MAX_LIST_LIMIT));
    usize::try_from(limit).unwrap_or(1)
}

/// GET /movies
#[instrument(skip(state, params))]
async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovieResponse>>, ApiError> {
    let limit = effective_limit(params.limit.as_deref());
    let mut movies = state.service.list().await?;
    movies.truncate(limit);

    Ok(Json(movies.into_iter().map(Into::into).collect()))
}

/// GET /movies/{id}
#[instrument(skip(state, id), fields(movie_id = %id))]
async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state.service.get(&id).await?;
    Ok(Json(movie.into()))
}

/// POST /movies
#[instrument(skip(state, body))]
async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MovieResponse>), ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    info!(title = %request.title, year = request.year, "handling create movie");

    let created = state
        .service
        .create(Movie::new(request.title, request.year))
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// DELETE /movies/{id}
#[instrument(skip(state, id), fields(movie_id = %id))]
async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the movie catalog.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", get(get_movie).delete(delete_movie))
}

//! REST API endpoints.
//!
//! Axum-based HTTP API for running tournaments: roster management,
//! round pairing, result entry and standings.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::director::DirectorError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DirectorError> for ApiError {
    fn from(err: DirectorError) -> Self {
        let message = err.to_string();
        match err {
            DirectorError::TournamentNotFound(_)
            | DirectorError::RoundNotFound(_)
            | DirectorError::BoardNotFound { .. }
            | DirectorError::Storage(StorageError::InvalidPath(_)) => ApiError::NotFound(message),
            DirectorError::InvalidInput(_) | DirectorError::NotEnoughPlayers(_) => {
                ApiError::BadRequest(message)
            }
            DirectorError::TournamentExists(_)
            | DirectorError::DuplicatePlayer(_)
            | DirectorError::RoundInProgress { .. }
            | DirectorError::TournamentFinished(_)
            | DirectorError::ByeBoard { .. } => ApiError::Conflict(message),
            DirectorError::Storage(_) => ApiError::Internal(message),
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            CorsLayer::new()
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    use routes::{rounds, standings, tournaments};

    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/api/tournaments/:id", get(tournaments::get_tournament))
        .route(
            "/api/tournaments/:id/players",
            get(tournaments::list_players).post(tournaments::register_player),
        )
        .route(
            "/api/tournaments/:id/rounds",
            get(rounds::list_rounds).post(rounds::pair_next_round),
        )
        .route(
            "/api/tournaments/:id/rounds/:round/boards/:board",
            put(rounds::record_result),
        )
        .route("/api/tournaments/:id/standings", get(standings::standings))
        .route("/api/tournaments/:id/ratings", get(standings::rating_changes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

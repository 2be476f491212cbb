use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{RatingChange, Standing, TournamentId};

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub tournament_id: TournamentId,
    /// Rounds with every result entered
    pub rounds_completed: u32,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Serialize)]
pub struct RatingChangesResponse {
    pub tournament_id: TournamentId,
    pub changes: Vec<RatingChange>,
}

pub async fn standings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let tournament_id = TournamentId::from(id);
    let standings = state.director.standings(&tournament_id)?;
    let rounds_completed = state
        .director
        .rounds(&tournament_id)?
        .iter()
        .filter(|r| r.is_complete())
        .count() as u32;

    Ok(Json(StandingsResponse {
        tournament_id,
        rounds_completed,
        standings,
    }))
}

pub async fn rating_changes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RatingChangesResponse>, ApiError> {
    let tournament_id = TournamentId::from(id);
    let changes = state.director.rating_changes(&tournament_id)?;
    Ok(Json(RatingChangesResponse {
        tournament_id,
        changes,
    }))
}

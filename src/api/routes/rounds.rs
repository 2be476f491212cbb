use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Outcome, Round, TournamentId};

#[derive(Debug, Serialize)]
pub struct RoundListResponse {
    pub tournament_id: TournamentId,
    pub rounds: Vec<Round>,
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    /// "1-0", "0-1", "1/2-1/2" or "*"
    pub result: Outcome,
}

pub async fn list_rounds(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundListResponse>, ApiError> {
    let tournament_id = TournamentId::from(id);
    let rounds = state.director.rounds(&tournament_id)?;
    Ok(Json(RoundListResponse {
        tournament_id,
        rounds,
    }))
}

pub async fn pair_next_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Round>), ApiError> {
    let round = state.director.pair_next_round(&id.into())?;
    Ok((StatusCode::CREATED, Json(round)))
}

pub async fn record_result(
    State(state): State<AppState>,
    Path((id, round, board)): Path<(String, u32, u32)>,
    Json(req): Json<RecordResultRequest>,
) -> Result<Json<Round>, ApiError> {
    let round = state
        .director
        .record_result(&id.into(), round, board, req.result)?;
    Ok(Json(round))
}

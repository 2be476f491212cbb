use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::director::NewTournament;
use crate::models::{Player, Tournament, TournamentId};

#[derive(Debug, Serialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<Tournament>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub rounds: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub tournament_id: TournamentId,
    pub players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
    pub rating: Option<u32>,
}

pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<TournamentListResponse>, ApiError> {
    let tournaments = state.director.tournaments()?;
    Ok(Json(TournamentListResponse { tournaments }))
}

pub async fn create_tournament(
    State(state): State<AppState>,
    Json(req): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let tournament = state.director.create_tournament(NewTournament {
        name: req.name,
        date: req.date,
        location: req.location,
        planned_rounds: req.rounds,
    })?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.director.tournament(&id.into())?))
}

pub async fn list_players(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let tournament_id = TournamentId::from(id);
    let players = state.director.players(&tournament_id)?;
    Ok(Json(PlayerListResponse {
        tournament_id,
        players,
    }))
}

pub async fn register_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state
        .director
        .register_player(&id.into(), &req.name, req.rating)?;
    Ok((StatusCode::CREATED, Json(player)))
}

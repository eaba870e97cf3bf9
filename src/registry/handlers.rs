use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{Player, Team},
    service::RegistryService,
    types::{PlayerRegistration, TeamCreateRequest, TeamUpdateRequest},
};
use crate::shared::{AppError, AppState};

fn registry(state: &AppState) -> RegistryService {
    RegistryService::new(
        Arc::clone(&state.player_repository),
        Arc::clone(&state.team_repository),
    )
}

/// POST /players
#[instrument(name = "register_player", skip(state, registration))]
pub async fn register_player(
    State(state): State<AppState>,
    Json(registration): Json<PlayerRegistration>,
) -> Result<Json<Player>, AppError> {
    let player = registry(&state).register_player(registration).await?;
    info!(player_id = %player.id, "Player registered via API");
    Ok(Json(player))
}

/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, AppError> {
    Ok(Json(registry(&state).list_players().await?))
}

/// GET /players/:id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, AppError> {
    Ok(Json(registry(&state).get_player(&player_id).await?))
}

/// POST /players/:id/approve
#[instrument(name = "approve_player", skip(state))]
pub async fn approve_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, AppError> {
    Ok(Json(registry(&state).approve_player(&player_id).await?))
}

/// POST /players/:id/reject
#[instrument(name = "reject_player", skip(state))]
pub async fn reject_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, AppError> {
    Ok(Json(registry(&state).reject_player(&player_id).await?))
}

/// POST /players/:id/verify-payment
#[instrument(name = "verify_payment", skip(state))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, AppError> {
    Ok(Json(registry(&state).verify_payment(&player_id).await?))
}

/// DELETE /players/:id
#[instrument(name = "delete_player", skip(state))]
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    registry(&state).delete_player(&player_id).await?;
    Ok(Json(serde_json::json!({ "deleted": player_id })))
}

/// POST /teams
#[instrument(name = "create_team", skip(state, request))]
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<TeamCreateRequest>,
) -> Result<Json<Team>, AppError> {
    let team = registry(&state).create_team(request).await?;
    info!(team_id = %team.id, "Team created via API");
    Ok(Json(team))
}

/// GET /teams
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, AppError> {
    Ok(Json(registry(&state).list_teams().await?))
}

/// GET /teams/:id
#[instrument(name = "get_team", skip(state))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Team>, AppError> {
    Ok(Json(registry(&state).get_team(&team_id).await?))
}

/// PATCH /teams/:id
#[instrument(name = "update_team", skip(state, request))]
pub async fn update_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Json(request): Json<TeamUpdateRequest>,
) -> Result<Json<Team>, AppError> {
    Ok(Json(registry(&state).update_team(&team_id, request).await?))
}

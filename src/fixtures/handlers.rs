use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::FixturesService,
    types::{CreateMatchRequest, FinalRequest, SemifinalsRequest},
};
use crate::registry::models::Team;
use crate::scoring::models::Match;
use crate::shared::{AppError, AppState};

fn fixtures(state: &AppState) -> FixturesService {
    FixturesService::new(
        Arc::clone(&state.team_repository),
        Arc::clone(&state.match_repository),
    )
}

/// POST /matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<CreateMatchRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        fixtures(&state)
            .create_match(
                &request.team1_id,
                &request.team2_id,
                request.stage,
                request.group_name,
            )
            .await?,
    ))
}

/// GET /matches
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, AppError> {
    Ok(Json(fixtures(&state).list_matches().await?))
}

/// GET /matches/:id
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(fixtures(&state).get_match(&match_id).await?))
}

/// POST /tournament/assign-groups
#[instrument(name = "assign_groups", skip(state))]
pub async fn assign_groups(State(state): State<AppState>) -> Result<Json<Vec<Team>>, AppError> {
    Ok(Json(fixtures(&state).assign_groups().await?))
}

/// POST /tournament/semifinals
#[instrument(name = "create_semifinals", skip(state, request))]
pub async fn create_semifinals(
    State(state): State<AppState>,
    Json(request): Json<SemifinalsRequest>,
) -> Result<Json<Vec<Match>>, AppError> {
    let (s1a, s1b) = &request.semifinal1_teams;
    let (s2a, s2b) = &request.semifinal2_teams;
    Ok(Json(
        fixtures(&state)
            .create_semifinals((s1a, s1b), (s2a, s2b))
            .await?,
    ))
}

/// POST /tournament/final
#[instrument(name = "create_final", skip(state, request))]
pub async fn create_final(
    State(state): State<AppState>,
    Json(request): Json<FinalRequest>,
) -> Result<Json<Match>, AppError> {
    Ok(Json(
        fixtures(&state)
            .create_final(&request.team1_id, &request.team2_id)
            .await?,
    ))
}

use axum::{extract::State, Json};
use tracing::instrument;

use super::models::{MvpEntry, OrangeCapEntry, PointsRow, PurpleCapEntry};
use crate::shared::{AppError, AppState};

/// GET /points-table
#[instrument(name = "points_table", skip(state))]
pub async fn points_table(
    State(state): State<AppState>,
) -> Result<Json<Vec<PointsRow>>, AppError> {
    Ok(Json(state.standings_service.points_table().await?))
}

/// GET /leaderboards/orange-cap
#[instrument(name = "orange_cap", skip(state))]
pub async fn orange_cap(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrangeCapEntry>>, AppError> {
    Ok(Json(state.standings_service.orange_cap().await?))
}

/// GET /leaderboards/purple-cap
#[instrument(name = "purple_cap", skip(state))]
pub async fn purple_cap(
    State(state): State<AppState>,
) -> Result<Json<Vec<PurpleCapEntry>>, AppError> {
    Ok(Json(state.standings_service.purple_cap().await?))
}

/// GET /leaderboards/mvp
#[instrument(name = "mvp_leaderboard", skip(state))]
pub async fn mvp(State(state): State<AppState>) -> Result<Json<Vec<MvpEntry>>, AppError> {
    Ok(Json(state.standings_service.mvp().await?))
}

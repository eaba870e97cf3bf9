use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::auction::repository::InMemoryAuctionStateRepository;
use crate::auction::service::AuctionService;
use crate::registry::repository::{
    InMemoryPlayerRepository, InMemoryTeamRepository, PlayerRepository, TeamRepository,
};
use crate::scoring::repository::{
    BallEventRepository, InMemoryBallEventRepository, InMemoryMatchRepository,
    InMemoryPlayerMatchStatsRepository, MatchRepository, PlayerMatchStatsRepository,
};
use crate::scoring::service::ScoringService;
use crate::standings::repository::InMemoryPointsRepository;
use crate::standings::service::StandingsService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository>,
    pub team_repository: Arc<dyn TeamRepository>,
    pub match_repository: Arc<dyn MatchRepository>,
    pub ball_event_repository: Arc<dyn BallEventRepository>,
    pub stats_repository: Arc<dyn PlayerMatchStatsRepository>,
    pub auction_service: Arc<AuctionService>,
    pub scoring_service: Arc<ScoringService>,
    pub standings_service: Arc<StandingsService>,
}

impl AppState {
    /// Wires the full application against in-memory repositories.
    ///
    /// Production deployments swap individual repositories for their
    /// database-backed implementations (see main.rs).
    pub fn in_memory() -> Self {
        let player_repository: Arc<dyn PlayerRepository> =
            Arc::new(InMemoryPlayerRepository::new());
        let team_repository: Arc<dyn TeamRepository> = Arc::new(InMemoryTeamRepository::new());
        let match_repository: Arc<dyn MatchRepository> = Arc::new(InMemoryMatchRepository::new());
        let ball_event_repository: Arc<dyn BallEventRepository> =
            Arc::new(InMemoryBallEventRepository::new());
        let stats_repository: Arc<dyn PlayerMatchStatsRepository> =
            Arc::new(InMemoryPlayerMatchStatsRepository::new());

        let standings_service = Arc::new(StandingsService::new(
            Arc::new(InMemoryPointsRepository::new()),
            Arc::clone(&stats_repository),
            Arc::clone(&player_repository),
        ));

        let auction_service = Arc::new(AuctionService::new(
            Arc::new(InMemoryAuctionStateRepository::new()),
            Arc::clone(&player_repository),
            Arc::clone(&team_repository),
        ));

        let scoring_service = Arc::new(ScoringService::new(
            Arc::clone(&match_repository),
            Arc::clone(&ball_event_repository),
            Arc::clone(&stats_repository),
            Arc::clone(&standings_service),
        ));

        Self {
            player_repository,
            team_repository,
            match_repository,
            ball_event_repository,
            stats_repository,
            auction_service,
            scoring_service,
            standings_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

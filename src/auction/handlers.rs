use axum::{extract::State, Json};
use tracing::instrument;

use super::{
    state::AuctionState,
    types::{BidRequest, NextLotRequest, SelectTierRequest, StartAuctionRequest},
};
use crate::shared::{AppError, AppState};

/// GET /auction/state
#[instrument(name = "auction_state", skip(state))]
pub async fn get_state(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.get_state().await?))
}

/// POST /auction/start
#[instrument(name = "auction_start", skip(state))]
pub async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartAuctionRequest>,
) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.start(request.tier).await?))
}

/// POST /auction/bid
#[instrument(name = "auction_bid", skip(state))]
pub async fn place_bid(
    State(state): State<AppState>,
    Json(request): Json<BidRequest>,
) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(
        state.auction_service.place_bid(&request.team_id).await?,
    ))
}

/// POST /auction/undo-bid
#[instrument(name = "auction_undo_bid", skip(state))]
pub async fn undo_bid(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.undo_bid().await?))
}

/// POST /auction/sell
#[instrument(name = "auction_sell", skip(state))]
pub async fn sell(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.sell().await?))
}

/// POST /auction/unsold
#[instrument(name = "auction_unsold", skip(state))]
pub async fn mark_unsold(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.mark_unsold().await?))
}

/// POST /auction/next
#[instrument(name = "auction_next", skip(state))]
pub async fn next(
    State(state): State<AppState>,
    Json(request): Json<NextLotRequest>,
) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.next(request.tier).await?))
}

/// POST /auction/select-tier
#[instrument(name = "auction_select_tier", skip(state))]
pub async fn select_tier(
    State(state): State<AppState>,
    Json(request): Json<SelectTierRequest>,
) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.select_tier(request.tier).await?))
}

/// POST /auction/pause
#[instrument(name = "auction_pause", skip(state))]
pub async fn pause(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.pause().await?))
}

/// POST /auction/resume
#[instrument(name = "auction_resume", skip(state))]
pub async fn resume(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.resume().await?))
}

/// POST /auction/stop
#[instrument(name = "auction_stop", skip(state))]
pub async fn stop(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.stop().await?))
}

/// POST /auction/reset
#[instrument(name = "auction_reset", skip(state))]
pub async fn reset(State(state): State<AppState>) -> Result<Json<AuctionState>, AppError> {
    Ok(Json(state.auction_service.reset().await?))
}

use axum::Router;
use pitchside::{build_router, AppState};

/// Builds the full application router over fresh in-memory repositories.
pub fn test_app() -> Router {
    build_router(AppState::in_memory())
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::{auction, fixtures, registry, scoring, shared::AppState, standings};

/// Wires the full operation surface. Layers (tracing, CORS) are added by the
/// binary.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Registry
        .route(
            "/players",
            post(registry::handlers::register_player).get(registry::handlers::list_players),
        )
        .route(
            "/players/:id",
            get(registry::handlers::get_player).delete(registry::handlers::delete_player),
        )
        .route(
            "/players/:id/approve",
            post(registry::handlers::approve_player),
        )
        .route(
            "/players/:id/reject",
            post(registry::handlers::reject_player),
        )
        .route(
            "/players/:id/verify-payment",
            post(registry::handlers::verify_payment),
        )
        .route(
            "/teams",
            post(registry::handlers::create_team).get(registry::handlers::list_teams),
        )
        .route(
            "/teams/:id",
            get(registry::handlers::get_team).patch(registry::handlers::update_team),
        )
        // Auction
        .route("/auction/state", get(auction::handlers::get_state))
        .route("/auction/start", post(auction::handlers::start))
        .route("/auction/bid", post(auction::handlers::place_bid))
        .route("/auction/undo-bid", post(auction::handlers::undo_bid))
        .route("/auction/sell", post(auction::handlers::sell))
        .route("/auction/unsold", post(auction::handlers::mark_unsold))
        .route("/auction/next", post(auction::handlers::next))
        .route(
            "/auction/select-tier",
            post(auction::handlers::select_tier),
        )
        .route("/auction/pause", post(auction::handlers::pause))
        .route("/auction/resume", post(auction::handlers::resume))
        .route("/auction/stop", post(auction::handlers::stop))
        .route("/auction/reset", post(auction::handlers::reset))
        // Fixtures
        .route(
            "/matches",
            post(fixtures::handlers::create_match).get(fixtures::handlers::list_matches),
        )
        .route("/matches/:id", get(fixtures::handlers::get_match))
        .route(
            "/tournament/assign-groups",
            post(fixtures::handlers::assign_groups),
        )
        .route(
            "/tournament/semifinals",
            post(fixtures::handlers::create_semifinals),
        )
        .route("/tournament/final", post(fixtures::handlers::create_final))
        // Scoring
        .route("/matches/:id/start", post(scoring::handlers::start_match))
        .route("/matches/:id/batsmen", post(scoring::handlers::set_batsmen))
        .route("/matches/:id/bowler", post(scoring::handlers::set_bowler))
        .route(
            "/matches/:id/new-batsman",
            post(scoring::handlers::new_batsman),
        )
        .route(
            "/matches/:id/power-over",
            post(scoring::handlers::set_power_over),
        )
        .route("/matches/:id/ball", post(scoring::handlers::record_ball))
        .route("/matches/:id/stats", get(scoring::handlers::match_stats))
        .route("/matches/:id/events", get(scoring::handlers::match_events))
        // Standings
        .route("/points-table", get(standings::handlers::points_table))
        .route(
            "/leaderboards/orange-cap",
            get(standings::handlers::orange_cap),
        )
        .route(
            "/leaderboards/purple-cap",
            get(standings::handlers::purple_cap),
        )
        .route("/leaderboards/mvp", get(standings::handlers::mvp))
        .with_state(state)
}

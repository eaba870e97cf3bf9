// Library crate for the tournament server
// This file exposes the public API for integration tests

pub mod auction;
pub mod fixtures;
pub mod registry;
pub mod routes;
pub mod scoring;
pub mod shared;
pub mod standings;

// Re-export commonly used types for easier access in tests
pub use auction::{AuctionService, AuctionState, AuctionStatus};
pub use registry::{Player, PlayerStatus, Team, Tier};
pub use routes::build_router;
pub use scoring::{BallEvent, Delivery, Match, MatchStatus, Overs, ScoringService};
pub use shared::{AppError, AppState};
pub use standings::StandingsService;

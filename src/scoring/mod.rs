pub mod engine;
pub mod handlers;
pub mod models;
pub mod overs;
pub mod repository;
pub mod service;
pub mod stats;
pub mod types;

pub use engine::{Delivery, DeliveryOutcome, MatchError};
pub use models::{
    BallEvent, ExtraType, Match, MatchOutcome, MatchRules, MatchStatus, PlayerMatchStats,
    PowerOver, Stage, TossDecision, WicketFall, WicketType,
};
pub use overs::Overs;
pub use service::ScoringService;

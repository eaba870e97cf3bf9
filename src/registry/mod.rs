pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

pub use models::{Player, PlayerStatus, Team, Tier, TierSchedule};
pub use service::RegistryService;

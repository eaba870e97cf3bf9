pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{MvpEntry, OrangeCapEntry, PointsRow, PurpleCapEntry};
pub use service::StandingsService;

pub mod handlers;
pub mod repository;
pub mod rules;
pub mod service;
pub mod state;
pub mod types;

pub use rules::AuctionRules;
pub use service::AuctionService;
pub use state::{AuctionError, AuctionState, AuctionStatus, Bid};

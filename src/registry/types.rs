use serde::{Deserialize, Serialize};

use super::models::{Group, PlayerRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRegistration {
    pub name: String,
    pub mobile: String,
    pub role: PlayerRole,
    pub batting_rating: u8,
    pub bowling_rating: u8,
    pub fielding_rating: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCreateRequest {
    pub name: String,
    pub short_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default = "default_budget")]
    pub budget: u32,
}

fn default_budget() -> u32 {
    30000
}

/// Partial update for team metadata. Budget fields are deliberately absent:
/// remaining budget is owned by the auction engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamUpdateRequest {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub group_name: Option<Group>,
}

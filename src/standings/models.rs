use serde::{Deserialize, Serialize};

use crate::scoring::overs::Overs;

/// One points-table row per team, updated incrementally after every
/// completed match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsRow {
    pub team_id: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub points: u32,
    pub runs_for: u32,
    pub overs_for: Overs,
    pub runs_against: u32,
    pub overs_against: Overs,
    pub nrr: f64,
}

impl PointsRow {
    pub fn new(team_id: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            played: 0,
            won: 0,
            lost: 0,
            tied: 0,
            points: 0,
            runs_for: 0,
            overs_for: Overs::default(),
            runs_against: 0,
            overs_against: Overs::default(),
            nrr: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrangeCapEntry {
    pub player_id: String,
    pub player_name: String,
    pub total_runs: u32,
    pub matches: u32,
    pub average: f64,
    pub strike_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurpleCapEntry {
    pub player_id: String,
    pub player_name: String,
    pub total_wickets: u32,
    pub matches: u32,
    pub economy: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MvpEntry {
    pub player_id: String,
    pub player_name: String,
    pub mvp_points: u32,
    pub runs: u32,
    pub wickets: u32,
    pub catches: u32,
}

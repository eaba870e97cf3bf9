use serde::{Deserialize, Serialize};

use super::engine::Delivery;
use super::models::{BallEvent, ExtraType, Match, TossDecision, WicketType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartMatchRequest {
    pub toss_winner_id: String,
    pub toss_decision: TossDecision,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBatsmenRequest {
    pub striker_id: String,
    pub non_striker_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBowlerRequest {
    pub bowler_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatsmanRequest {
    pub player_id: String,
    #[serde(default)]
    pub replace_striker: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerOverRequest {
    pub over_number: u32,
    pub innings: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallRequest {
    #[serde(default)]
    pub runs: u32,
    pub extra: Option<ExtraType>,
    pub wicket: Option<WicketType>,
    pub dismissed_player_id: Option<String>,
}

impl From<BallRequest> for Delivery {
    fn from(request: BallRequest) -> Self {
        Delivery {
            runs: request.runs,
            extra: request.extra,
            wicket: request.wicket,
            dismissed_player_id: request.dismissed_player_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallResponse {
    #[serde(rename = "match")]
    pub match_state: Match,
    pub event: BallEvent,
}

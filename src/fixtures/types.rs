use serde::{Deserialize, Serialize};

use crate::registry::models::Group;
use crate::scoring::models::Stage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub team1_id: String,
    pub team2_id: String,
    #[serde(default = "default_stage")]
    pub stage: Stage,
    pub group_name: Option<Group>,
}

fn default_stage() -> Stage {
    Stage::Group
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemifinalsRequest {
    pub semifinal1_teams: (String, String),
    pub semifinal2_teams: (String, String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRequest {
    pub team1_id: String,
    pub team2_id: String,
}

use serde::{Deserialize, Serialize};

use crate::registry::models::Tier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAuctionRequest {
    pub tier: Tier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRequest {
    pub team_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextLotRequest {
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectTierRequest {
    pub tier: Tier,
}

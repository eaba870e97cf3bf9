use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
}

/// Auction price band a player lands in once approved. Ordering is by
/// descending base price, which is also the order tiers go under the hammer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Superstar,
    Performer,
    Prospect,
    Gem,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tier::Superstar => "superstar",
                Tier::Performer => "performer",
                Tier::Prospect => "prospect",
                Tier::Gem => "gem",
            }
        )
    }
}

/// Tier placement rules: base prices per tier and the summed-rating cutoffs
/// used at approval time. Kept as data so price-band changes never touch the
/// engine code.
#[derive(Debug, Clone)]
pub struct TierSchedule {
    prices: Vec<(Tier, u32)>,
    cutoffs: Vec<(u8, Tier)>,
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            prices: vec![
                (Tier::Superstar, 3000),
                (Tier::Performer, 2500),
                (Tier::Prospect, 2000),
                (Tier::Gem, 1500),
            ],
            cutoffs: vec![
                (24, Tier::Superstar),
                (18, Tier::Performer),
                (12, Tier::Prospect),
            ],
        }
    }
}

impl TierSchedule {
    pub fn base_points(&self, tier: Tier) -> u32 {
        self.prices
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, price)| *price)
            .unwrap_or(0)
    }

    /// Places a total skill rating (batting + bowling + fielding) into a tier.
    /// Cutoffs are checked top down; anything below the last cutoff is a Gem.
    pub fn tier_for_rating(&self, total_rating: u8) -> Tier {
        self.cutoffs
            .iter()
            .find(|(cutoff, _)| total_rating >= *cutoff)
            .map(|(_, tier)| *tier)
            .unwrap_or(Tier::Gem)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Verified,
}

/// Auction lifecycle of a player. Registered players enter the auction pool,
/// get sold or fall into the lost-gold pool for a second pass, and only after
/// that second pass can they end up permanently unsold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Registered,
    InAuction,
    Sold,
    Unsold,
    LostGold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Group {
    A,
    B,
    C,
    D,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Group::A => "A",
                Group::B => "B",
                Group::C => "C",
                Group::D => "D",
            }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub role: PlayerRole,
    pub batting_rating: u8,
    pub bowling_rating: u8,
    pub fielding_rating: u8,
    /// Set exactly once, when the player is approved.
    pub tier: Option<Tier>,
    pub approval: ApprovalStatus,
    pub payment: PaymentStatus,
    pub status: PlayerStatus,
    pub team_id: Option<String>,
    pub sold_price: Option<u32>,
    /// Set by the auction when a sale is finalized; cleared on reset.
    pub is_locked: bool,
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(
        name: String,
        mobile: String,
        role: PlayerRole,
        batting_rating: u8,
        bowling_rating: u8,
        fielding_rating: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            mobile,
            role,
            batting_rating,
            bowling_rating,
            fielding_rating,
            tier: None,
            approval: ApprovalStatus::Pending,
            payment: PaymentStatus::Pending,
            status: PlayerStatus::Registered,
            team_id: None,
            sold_price: None,
            is_locked: false,
            registered_at: Utc::now(),
        }
    }

    pub fn total_rating(&self) -> u8 {
        self.batting_rating + self.bowling_rating + self.fielding_rating
    }

    /// A player may be put up for auction only after approval and payment
    /// verification.
    pub fn is_auction_eligible(&self) -> bool {
        self.approval == ApprovalStatus::Approved && self.payment == PaymentStatus::Verified
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub budget: u32,
    pub remaining_budget: u32,
    pub group_name: Option<Group>,
}

impl Team {
    pub fn new(
        name: String,
        short_name: String,
        primary_color: String,
        secondary_color: String,
        budget: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            short_name,
            primary_color,
            secondary_color,
            budget,
            remaining_budget: budget,
            group_name: None,
        }
    }
}

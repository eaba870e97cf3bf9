use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rules::AuctionRules;
use crate::registry::models::{Team, Tier};
use crate::shared::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    NotStarted,
    InProgress,
    Paused,
    LostGoldRound,
    Completed,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuctionError {
    #[error("Auction has already started")]
    AlreadyStarted,
    #[error("Bidding is not open")]
    BiddingClosed,
    #[error("Auction is not in progress")]
    NotInProgress,
    #[error("Auction is not paused")]
    NotPaused,
    #[error("No approved, payment-verified players available in tier {0}")]
    NoEligiblePlayers(Tier),
    #[error("Bid of {bid} exceeds remaining budget of {remaining}")]
    InsufficientBudget { bid: u32, remaining: u32 },
    #[error("Team already holds the leading bid")]
    TeamAlreadyLeading,
    #[error("No bids to undo")]
    NoBidsToUndo,
    #[error("No player is currently up for auction")]
    NoCurrentPlayer,
    #[error("A player is currently up for auction")]
    LotInProgress,
    #[error("No leading bid to resolve a sale against")]
    NoBiddingTeam,
}

impl From<AuctionError> for AppError {
    fn from(err: AuctionError) -> Self {
        match err {
            // Resolving a sale without a leading bid is a caller bug, not a
            // user-facing condition.
            AuctionError::NoBiddingTeam => AppError::Conflict(err.to_string()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub team_id: String,
    pub amount: u32,
    pub at: DateTime<Utc>,
}

/// The auction singleton. One lot (player) is live at a time; `bid_history`
/// only ever covers the current lot and is cleared whenever a lot opens or
/// resolves.
///
/// Invariants: `current_bid` is Some iff `current_player_id` is Some, and the
/// last entry of `bid_history` always names `current_bidding_team_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionState {
    pub status: AuctionStatus,
    pub current_player_id: Option<String>,
    pub current_bid: Option<u32>,
    pub current_bidding_team_id: Option<String>,
    pub current_tier: Option<Tier>,
    pub bid_history: Vec<Bid>,
}

impl Default for AuctionState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuctionState {
    pub fn new() -> Self {
        Self {
            status: AuctionStatus::NotStarted,
            current_player_id: None,
            current_bid: None,
            current_bidding_team_id: None,
            current_tier: None,
            bid_history: Vec::new(),
        }
    }

    pub fn bidding_open(&self) -> bool {
        matches!(
            self.status,
            AuctionStatus::InProgress | AuctionStatus::LostGoldRound
        )
    }

    fn ensure_bidding_open(&self) -> Result<(), AuctionError> {
        if self.bidding_open() {
            Ok(())
        } else {
            Err(AuctionError::BiddingClosed)
        }
    }

    /// Puts a player up for auction at their tier's base price.
    pub fn open_lot(&mut self, player_id: &str, tier: Tier, base_price: u32, status: AuctionStatus) {
        self.status = status;
        self.current_player_id = Some(player_id.to_string());
        self.current_bid = Some(base_price);
        self.current_bidding_team_id = None;
        self.current_tier = Some(tier);
        self.bid_history.clear();
    }

    /// Clears the live lot fields; the tier selection is kept.
    pub fn close_lot(&mut self) {
        self.current_player_id = None;
        self.current_bid = None;
        self.current_bidding_team_id = None;
        self.bid_history.clear();
    }

    pub fn complete(&mut self) {
        self.close_lot();
        self.status = AuctionStatus::Completed;
    }

    /// Applies one bid from `team` and returns the new bid amount.
    pub fn apply_bid(
        &mut self,
        team: &Team,
        rules: &AuctionRules,
        at: DateTime<Utc>,
    ) -> Result<u32, AuctionError> {
        self.ensure_bidding_open()?;
        let current = self.current_bid.ok_or(AuctionError::NoCurrentPlayer)?;

        if self.current_bidding_team_id.as_deref() == Some(team.id.as_str()) {
            return Err(AuctionError::TeamAlreadyLeading);
        }

        let new_bid = current + rules.increment_for(current);
        if new_bid > team.remaining_budget {
            return Err(AuctionError::InsufficientBudget {
                bid: new_bid,
                remaining: team.remaining_budget,
            });
        }

        self.bid_history.push(Bid {
            team_id: team.id.clone(),
            amount: new_bid,
            at,
        });
        self.current_bid = Some(new_bid);
        self.current_bidding_team_id = Some(team.id.clone());
        Ok(new_bid)
    }

    /// Pops the last bid, restoring the previous bid or the tier base price
    /// when the history empties.
    pub fn undo_bid(&mut self, base_price: u32) -> Result<(), AuctionError> {
        self.ensure_bidding_open()?;
        if self.bid_history.pop().is_none() {
            return Err(AuctionError::NoBidsToUndo);
        }

        match self.bid_history.last() {
            Some(previous) => {
                self.current_bid = Some(previous.amount);
                self.current_bidding_team_id = Some(previous.team_id.clone());
            }
            None => {
                self.current_bid = Some(base_price);
                self.current_bidding_team_id = None;
            }
        }
        Ok(())
    }
}

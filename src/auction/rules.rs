use crate::registry::models::{Tier, TierSchedule};

/// One row of the bid increment table: `step` applies while the current bid
/// is below `below`; a `None` threshold is the open-ended tail.
#[derive(Debug, Clone)]
pub struct IncrementStep {
    pub below: Option<u32>,
    pub step: u32,
}

/// Bidding rules: tier schedule plus the ordered increment step table.
/// All thresholds live here as data so rule changes never touch the
/// state-transition code.
#[derive(Debug, Clone)]
pub struct AuctionRules {
    pub schedule: TierSchedule,
    increments: Vec<IncrementStep>,
}

impl Default for AuctionRules {
    fn default() -> Self {
        Self {
            schedule: TierSchedule::default(),
            increments: vec![
                IncrementStep {
                    below: Some(4000),
                    step: 100,
                },
                IncrementStep { below: None, step: 200 },
            ],
        }
    }
}

impl AuctionRules {
    pub fn base_price(&self, tier: Tier) -> u32 {
        self.schedule.base_points(tier)
    }

    /// Increment to add on top of `current_bid` for the next bid.
    pub fn increment_for(&self, current_bid: u32) -> u32 {
        self.increments
            .iter()
            .find(|step| step.below.map_or(true, |threshold| current_bid < threshold))
            .map(|step| step.step)
            .unwrap_or(0)
    }
}

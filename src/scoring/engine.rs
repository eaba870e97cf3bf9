use chrono::Utc;
use uuid::Uuid;

use super::models::{
    BallEvent, ExtraType, Match, MatchOutcome, MatchRules, MatchStatus, PowerOver, TossDecision,
    WicketFall, WicketType,
};
use crate::shared::AppError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    #[error("Match is not live")]
    NotLive,
    #[error("Match is not in the scheduled state")]
    NotScheduled,
    #[error("Batsmen must be set before scoring")]
    BatsmenNotSet,
    #[error("A bowler must be set before scoring")]
    BowlerNotSet,
    #[error("Striker and non-striker must be different players")]
    DuplicateBatsmen,
    #[error("The last remaining batter cannot be dismissed")]
    LastManStanding,
    #[error("Dismissed player {0} is not at the crease")]
    BatterNotAtCrease(String),
    #[error("Toss winner must be one of the two competing teams")]
    InvalidTossWinner,
    #[error("Power over must target over 1..={max_over} of innings 1 or 2")]
    InvalidPowerOver { max_over: u32 },
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// One delivery attempt as called by the scorer. Mirrors the recordBall
/// operation surface: dismissed player defaults to the striker.
#[derive(Debug, Clone, Default)]
pub struct Delivery {
    pub runs: u32,
    pub extra: Option<ExtraType>,
    pub wicket: Option<WicketType>,
    pub dismissed_player_id: Option<String>,
}

/// Everything a caller needs to persist after one delivery transition.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub event: BallEvent,
    pub end_of_over: bool,
    pub innings_ended: bool,
    pub match_completed: bool,
}

impl Match {
    /// Starts the match with the toss outcome. Innings 1 is always scored
    /// against team 1's scoreboard.
    pub fn start(
        &mut self,
        toss_winner_id: &str,
        toss_decision: TossDecision,
    ) -> Result<(), MatchError> {
        if self.status != MatchStatus::Scheduled {
            return Err(MatchError::NotScheduled);
        }
        if toss_winner_id != self.team1_id && toss_winner_id != self.team2_id {
            return Err(MatchError::InvalidTossWinner);
        }

        self.status = MatchStatus::Live;
        self.toss_winner_id = Some(toss_winner_id.to_string());
        self.toss_decision = Some(toss_decision);
        self.current_innings = 1;
        Ok(())
    }

    /// Sets the opening pair for the current innings and extends the batting
    /// order with any newcomer.
    pub fn set_batsmen(&mut self, striker_id: &str, non_striker_id: &str) -> Result<(), MatchError> {
        if self.status != MatchStatus::Live {
            return Err(MatchError::NotLive);
        }
        if striker_id == non_striker_id {
            return Err(MatchError::DuplicateBatsmen);
        }

        let order = self.batting_order_mut();
        for id in [striker_id, non_striker_id] {
            if !order.iter().any(|existing| existing == id) {
                order.push(id.to_string());
            }
        }
        self.striker_id = Some(striker_id.to_string());
        self.non_striker_id = Some(non_striker_id.to_string());
        Ok(())
    }

    pub fn set_bowler(&mut self, bowler_id: &str) -> Result<(), MatchError> {
        if self.status != MatchStatus::Live {
            return Err(MatchError::NotLive);
        }

        let order = self.bowling_order_mut();
        if !order.iter().any(|existing| existing == bowler_id) {
            order.push(bowler_id.to_string());
        }
        self.current_bowler_id = Some(bowler_id.to_string());
        Ok(())
    }

    /// Brings the incoming batter to the crease slot vacated by a dismissal.
    pub fn new_batsman(&mut self, player_id: &str, replace_striker: bool) -> Result<(), MatchError> {
        if self.status != MatchStatus::Live {
            return Err(MatchError::NotLive);
        }

        let order = self.batting_order_mut();
        if !order.iter().any(|existing| existing == player_id) {
            order.push(player_id.to_string());
        }
        if replace_striker {
            self.striker_id = Some(player_id.to_string());
        } else {
            self.non_striker_id = Some(player_id.to_string());
        }
        Ok(())
    }

    pub fn designate_power_over(
        &mut self,
        over_number: u32,
        innings: u8,
        rules: &MatchRules,
    ) -> Result<(), MatchError> {
        if self.status != MatchStatus::Live {
            return Err(MatchError::NotLive);
        }
        if !(1..=rules.overs_per_innings).contains(&over_number) || !(1..=2).contains(&innings) {
            return Err(MatchError::InvalidPowerOver {
                max_over: rules.overs_per_innings,
            });
        }

        self.power_over = Some(PowerOver {
            innings,
            over_number,
        });
        Ok(())
    }

    /// Advances the match by exactly one delivery attempt. All-or-nothing:
    /// any precondition failure returns before anything is mutated.
    pub fn apply_delivery(
        &mut self,
        delivery: &Delivery,
        rules: &MatchRules,
    ) -> Result<DeliveryOutcome, MatchError> {
        if self.status != MatchStatus::Live {
            return Err(MatchError::NotLive);
        }
        let striker_id = self.striker_id.clone().ok_or(MatchError::BatsmenNotSet)?;
        let bowler_id = self
            .current_bowler_id
            .clone()
            .ok_or(MatchError::BowlerNotSet)?;

        let innings = self.current_innings;
        let max_wickets = rules.max_wickets();
        let wickets_before = self.batting_innings().wickets;
        let last_man_before = wickets_before >= max_wickets;

        // The non-striker may only be absent once the side is down to its
        // last batter.
        if self.non_striker_id.is_none() && !last_man_before {
            return Err(MatchError::BatsmenNotSet);
        }

        let wicket = match delivery.wicket {
            Some(kind) => {
                if wickets_before >= max_wickets {
                    return Err(MatchError::LastManStanding);
                }
                let dismissed_id = delivery
                    .dismissed_player_id
                    .clone()
                    .unwrap_or_else(|| striker_id.clone());
                if dismissed_id != striker_id
                    && self.non_striker_id.as_deref() != Some(dismissed_id.as_str())
                {
                    return Err(MatchError::BatterNotAtCrease(dismissed_id));
                }
                Some(WicketFall {
                    kind,
                    player_id: dismissed_id,
                })
            }
            None => None,
        };

        // Only legal deliveries advance the ball counter; wides and no-balls
        // are re-bowled.
        let legal = delivery.extra.is_none();
        let overs_before = self.batting_innings().overs;
        let mut new_overs = overs_before;
        let end_of_over = legal && new_overs.add_ball();

        let in_power_over = self
            .power_over
            .is_some_and(|p| p.innings == innings && p.over_number == overs_before.completed() + 1);

        let actual_runs = delivery.runs;
        let effective_runs = if in_power_over && actual_runs > 0 {
            actual_runs * 2
        } else {
            actual_runs
        };

        let mut new_runs = self.batting_innings().runs + effective_runs;
        if delivery.extra.is_some() {
            // Wide or no-ball: one penalty run, never doubled
            new_runs += 1;
        }

        let mut new_wickets = wickets_before;
        if wicket.is_some() {
            new_wickets += 1;
            if in_power_over {
                new_runs = new_runs.saturating_sub(rules.power_over_penalty);
            }
        }
        let last_man_after = new_wickets >= max_wickets;

        // Strike rotation composes two toggles: odd runs, and end of over.
        // An odd single off the last ball of the over therefore cancels out.
        let mut rotate = false;
        if wicket.is_none()
            && delivery.extra.is_none()
            && self.non_striker_id.is_some()
            && !last_man_after
            && actual_runs % 2 == 1
        {
            rotate = true;
        }
        if end_of_over && !last_man_after && self.non_striker_id.is_some() {
            rotate = !rotate;
        }

        if let Some(fall) = &wicket {
            let dismissed_is_striker = fall.player_id == striker_id;
            let survivor = if dismissed_is_striker {
                self.non_striker_id.clone()
            } else {
                Some(striker_id.clone())
            };

            if last_man_after {
                // Only one batter remains; they take strike alone
                self.striker_id = survivor;
                self.non_striker_id = None;
            } else if dismissed_is_striker {
                self.striker_id = None;
            } else {
                self.non_striker_id = None;
            }
        } else if rotate {
            std::mem::swap(&mut self.striker_id, &mut self.non_striker_id);
        }

        if end_of_over {
            // A fresh bowler must be set before the next delivery
            self.current_bowler_id = None;
        }

        let innings_ended = new_overs.completed() >= rules.overs_per_innings;

        {
            let score = self.batting_innings_mut();
            score.runs = new_runs;
            score.wickets = new_wickets;
            score.overs = new_overs;
        }

        let mut match_completed = false;
        if innings == 1 {
            if innings_ended {
                self.current_innings = 2;
                self.striker_id = None;
                self.non_striker_id = None;
                self.current_bowler_id = None;
            }
        } else {
            let target = self.team1_innings.runs + 1;
            if new_runs >= target {
                // Chase completed; the match ends on this ball even with
                // overs in hand
                self.status = MatchStatus::Completed;
                self.winner_id = Some(self.team2_id.clone());
                self.outcome = Some(MatchOutcome::Win);
                match_completed = true;
            } else if innings_ended {
                self.status = MatchStatus::Completed;
                if new_runs == self.team1_innings.runs {
                    self.outcome = Some(MatchOutcome::Tie);
                } else {
                    self.winner_id = Some(self.team1_id.clone());
                    self.outcome = Some(MatchOutcome::Win);
                }
                match_completed = true;
            }
        }

        let event = BallEvent {
            id: Uuid::new_v4().to_string(),
            match_id: self.id.clone(),
            innings,
            over_number: overs_before.completed() + 1,
            ball_number: if legal {
                overs_before.balls() + 1
            } else {
                overs_before.balls()
            },
            striker_id,
            bowler_id,
            actual_runs,
            effective_runs,
            extra: delivery.extra,
            wicket,
            power_over: in_power_over,
            recorded_at: Utc::now(),
        };

        Ok(DeliveryOutcome {
            event,
            end_of_over,
            innings_ended,
            match_completed,
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::overs::Overs;
use crate::registry::models::Group;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Group,
    Semifinal,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Tie,
}

/// Illegal delivery kinds. Anything else is a legal ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
    Wide,
    NoBall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
}

/// Admin-designated over in which runs double and wickets cost runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerOver {
    pub innings: u8,
    pub over_number: u32,
}

/// Fixed match format parameters. The wicket cap follows from the squad
/// size: the side is never all out below one remaining batter.
#[derive(Debug, Clone)]
pub struct MatchRules {
    pub squad_size: u32,
    pub overs_per_innings: u32,
    pub power_over_penalty: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            squad_size: 8,
            overs_per_innings: 6,
            power_over_penalty: 5,
        }
    }
}

impl MatchRules {
    pub fn max_wickets(&self) -> u32 {
        self.squad_size - 1
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsScore {
    pub runs: u32,
    pub wickets: u32,
    pub overs: Overs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub match_number: u32,
    pub team1_id: String,
    pub team2_id: String,
    pub status: MatchStatus,
    pub stage: Stage,
    pub group_name: Option<Group>,
    pub toss_winner_id: Option<String>,
    pub toss_decision: Option<TossDecision>,
    pub winner_id: Option<String>,
    pub outcome: Option<MatchOutcome>,
    pub team1_innings: InningsScore,
    pub team2_innings: InningsScore,
    /// 1 while the first innings is in progress, 2 afterwards.
    pub current_innings: u8,
    pub striker_id: Option<String>,
    pub non_striker_id: Option<String>,
    pub current_bowler_id: Option<String>,
    /// Batting order per innings, in arrival order at the crease.
    pub batting_order: [Vec<String>; 2],
    /// Bowling order per innings, in first-over order.
    pub bowling_order: [Vec<String>; 2],
    pub power_over: Option<PowerOver>,
}

impl Match {
    pub fn new(
        match_number: u32,
        team1_id: String,
        team2_id: String,
        stage: Stage,
        group_name: Option<Group>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            match_number,
            team1_id,
            team2_id,
            status: MatchStatus::Scheduled,
            stage,
            group_name,
            toss_winner_id: None,
            toss_decision: None,
            winner_id: None,
            outcome: None,
            team1_innings: InningsScore::default(),
            team2_innings: InningsScore::default(),
            current_innings: 1,
            striker_id: None,
            non_striker_id: None,
            current_bowler_id: None,
            batting_order: [Vec::new(), Vec::new()],
            bowling_order: [Vec::new(), Vec::new()],
            power_over: None,
        }
    }

    pub fn batting_innings(&self) -> &InningsScore {
        if self.current_innings == 1 {
            &self.team1_innings
        } else {
            &self.team2_innings
        }
    }

    pub fn batting_innings_mut(&mut self) -> &mut InningsScore {
        if self.current_innings == 1 {
            &mut self.team1_innings
        } else {
            &mut self.team2_innings
        }
    }

    pub fn batting_order_mut(&mut self) -> &mut Vec<String> {
        let innings = self.current_innings as usize - 1;
        &mut self.batting_order[innings]
    }

    pub fn bowling_order_mut(&mut self) -> &mut Vec<String> {
        let innings = self.current_innings as usize - 1;
        &mut self.bowling_order[innings]
    }
}

/// A batter dismissal attached to one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WicketFall {
    pub kind: WicketType,
    pub player_id: String,
}

/// Immutable record of exactly one delivery attempt. This is the audit log
/// every derived statistic can be rebuilt from; rows are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallEvent {
    pub id: String,
    pub match_id: String,
    pub innings: u8,
    /// 1-based over in progress when the ball was bowled.
    pub over_number: u32,
    /// Legal-ball count within the over after this delivery; unchanged for
    /// wides and no-balls.
    pub ball_number: u32,
    pub striker_id: String,
    pub bowler_id: String,
    /// Runs off the bat as called by the scorer.
    pub actual_runs: u32,
    /// Runs credited to the team total after the power-over multiplier.
    pub effective_runs: u32,
    pub extra: Option<ExtraType>,
    pub wicket: Option<WicketFall>,
    pub power_over: bool,
    pub recorded_at: DateTime<Utc>,
}

impl BallEvent {
    pub fn is_legal(&self) -> bool {
        self.extra.is_none()
    }
}

/// Per (match, player, innings) scorecard row, upserted incrementally as
/// balls are recorded. Always derivable from the BallEvent log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub match_id: String,
    pub player_id: String,
    pub innings: u8,
    pub batting_position: Option<u32>,
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub overs_bowled: Overs,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
    pub catches: u32,
    pub is_out: bool,
    pub dismissal: Option<WicketType>,
    pub dismissed_by: Option<String>,
}

impl PlayerMatchStats {
    pub fn new(match_id: &str, player_id: &str, innings: u8) -> Self {
        Self {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
            innings,
            batting_position: None,
            runs_scored: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            overs_bowled: Overs::default(),
            runs_conceded: 0,
            wickets_taken: 0,
            catches: 0,
            is_out: false,
            dismissal: None,
            dismissed_by: None,
        }
    }
}

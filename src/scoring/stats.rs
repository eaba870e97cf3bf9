use std::collections::HashMap;

use super::models::{BallEvent, PlayerMatchStats};

/// Stat deltas for one delivery. These functions are the single source of
/// scoring arithmetic: the live incremental upserts and the rebuild-from-log
/// path both go through them, so the cached rows cannot drift from the
/// BallEvent log.
///
/// Batting: only legal deliveries touch the striker's row, and always with
/// the actual (pre-multiplier) runs.
pub fn apply_batting(stats: &mut PlayerMatchStats, event: &BallEvent) {
    if !event.is_legal() {
        return;
    }
    stats.runs_scored += event.actual_runs;
    stats.balls_faced += 1;
    if event.actual_runs == 4 {
        stats.fours += 1;
    }
    if event.actual_runs == 6 {
        stats.sixes += 1;
    }
}

/// Bowling: legal deliveries count a ball and concede the effective runs;
/// wides and no-balls concede the effective runs plus the penalty run but do
/// not count a ball. Wickets on legal deliveries credit the bowler.
pub fn apply_bowling(stats: &mut PlayerMatchStats, event: &BallEvent) {
    if event.is_legal() {
        stats.overs_bowled.add_ball();
        stats.runs_conceded += event.effective_runs;
        if event.wicket.is_some() {
            stats.wickets_taken += 1;
        }
    } else {
        stats.runs_conceded += event.effective_runs + 1;
    }
}

/// Marks the dismissed batter's row; the bowler on the delivery is credited
/// as the dismisser.
pub fn apply_dismissal(stats: &mut PlayerMatchStats, event: &BallEvent) {
    if let Some(fall) = &event.wicket {
        stats.is_out = true;
        stats.dismissal = Some(fall.kind);
        stats.dismissed_by = Some(event.bowler_id.clone());
    }
}

/// Replays a match's BallEvent log into a fresh set of stat rows, keyed by
/// (player, innings). Used to verify the incremental rows and to recover
/// from a crash mid-update. Batting positions are crease-arrival metadata
/// and are not recoverable from the log alone.
pub fn rebuild_from_events(events: &[BallEvent]) -> HashMap<(String, u8), PlayerMatchStats> {
    let mut rows: HashMap<(String, u8), PlayerMatchStats> = HashMap::new();

    for event in events {
        let striker = rows
            .entry((event.striker_id.clone(), event.innings))
            .or_insert_with(|| {
                PlayerMatchStats::new(&event.match_id, &event.striker_id, event.innings)
            });
        apply_batting(striker, event);

        let bowler = rows
            .entry((event.bowler_id.clone(), event.innings))
            .or_insert_with(|| {
                PlayerMatchStats::new(&event.match_id, &event.bowler_id, event.innings)
            });
        apply_bowling(bowler, event);

        if let Some(fall) = &event.wicket {
            let dismissed = rows
                .entry((fall.player_id.clone(), event.innings))
                .or_insert_with(|| {
                    PlayerMatchStats::new(&event.match_id, &fall.player_id, event.innings)
                });
            apply_dismissal(dismissed, event);
        }
    }

    rows
}

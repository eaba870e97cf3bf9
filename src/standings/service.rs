use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{MvpEntry, OrangeCapEntry, PointsRow, PurpleCapEntry},
    repository::PointsRepository,
};
use crate::registry::repository::PlayerRepository;
use crate::scoring::models::{Match, MatchOutcome, MatchStatus, PlayerMatchStats};
use crate::scoring::overs::Overs;
use crate::scoring::repository::PlayerMatchStatsRepository;
use crate::shared::AppError;

const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_TIE: u32 = 1;

/// MVP weighting over a player's aggregate numbers.
fn mvp_points(runs: u32, wickets: u32, catches: u32) -> u32 {
    runs + 20 * wickets + 10 * catches
}

/// Net run rate: run rate scored minus run rate conceded, with overs read as
/// full overs plus balls/6. Zero overs on either side yields 0.
fn net_run_rate(runs_for: u32, overs_for: Overs, runs_against: u32, overs_against: Overs) -> f64 {
    let for_decimal = overs_for.as_decimal();
    let against_decimal = overs_against.as_decimal();
    if for_decimal == 0.0 || against_decimal == 0.0 {
        return 0.0;
    }
    f64::from(runs_for) / for_decimal - f64::from(runs_against) / against_decimal
}

/// Pure projection over completed matches and player stat rows: the points
/// table and the individual leaderboards. Holds no state machine of its own.
pub struct StandingsService {
    points: Arc<dyn PointsRepository>,
    stats: Arc<dyn PlayerMatchStatsRepository>,
    players: Arc<dyn PlayerRepository>,
}

#[derive(Debug, Default, Clone)]
struct PlayerTotals {
    matches: Vec<String>,
    runs: u32,
    balls: u32,
    outs: u32,
    wickets: u32,
    overs_bowled: Overs,
    conceded: u32,
    catches: u32,
}

impl StandingsService {
    pub fn new(
        points: Arc<dyn PointsRepository>,
        stats: Arc<dyn PlayerMatchStatsRepository>,
        players: Arc<dyn PlayerRepository>,
    ) -> Self {
        Self {
            points,
            stats,
            players,
        }
    }

    /// Folds one completed match into both teams' points-table rows.
    #[instrument(skip(self, m), fields(match_id = %m.id))]
    pub async fn record_result(&self, m: &Match) -> Result<(), AppError> {
        if m.status != MatchStatus::Completed {
            return Err(AppError::Conflict(
                "Standings only accept completed matches".to_string(),
            ));
        }

        let mut team1_row = self
            .points
            .get_row(&m.team1_id)
            .await?
            .unwrap_or_else(|| PointsRow::new(&m.team1_id));
        let mut team2_row = self
            .points
            .get_row(&m.team2_id)
            .await?
            .unwrap_or_else(|| PointsRow::new(&m.team2_id));

        team1_row.played += 1;
        team1_row.runs_for += m.team1_innings.runs;
        team1_row.runs_against += m.team2_innings.runs;
        team1_row.overs_for = team1_row.overs_for.add(m.team1_innings.overs);
        team1_row.overs_against = team1_row.overs_against.add(m.team2_innings.overs);

        team2_row.played += 1;
        team2_row.runs_for += m.team2_innings.runs;
        team2_row.runs_against += m.team1_innings.runs;
        team2_row.overs_for = team2_row.overs_for.add(m.team2_innings.overs);
        team2_row.overs_against = team2_row.overs_against.add(m.team1_innings.overs);

        match m.outcome {
            Some(MatchOutcome::Tie) => {
                team1_row.tied += 1;
                team1_row.points += POINTS_FOR_TIE;
                team2_row.tied += 1;
                team2_row.points += POINTS_FOR_TIE;
            }
            Some(MatchOutcome::Win) => {
                let winner_id = m.winner_id.as_deref().ok_or_else(|| {
                    AppError::Conflict("Completed win without a winner".to_string())
                })?;
                if winner_id == m.team1_id {
                    team1_row.won += 1;
                    team1_row.points += POINTS_FOR_WIN;
                    team2_row.lost += 1;
                } else {
                    team2_row.won += 1;
                    team2_row.points += POINTS_FOR_WIN;
                    team1_row.lost += 1;
                }
            }
            None => {
                return Err(AppError::Conflict(
                    "Completed match without an outcome".to_string(),
                ))
            }
        }

        for row in [&mut team1_row, &mut team2_row] {
            row.nrr = net_run_rate(row.runs_for, row.overs_for, row.runs_against, row.overs_against);
        }

        self.points.upsert_row(&team1_row).await?;
        self.points.upsert_row(&team2_row).await?;

        info!(match_id = %m.id, "Points table updated");
        Ok(())
    }

    /// Points table ordered by points, then net run rate, then team id.
    pub async fn points_table(&self) -> Result<Vec<PointsRow>, AppError> {
        let mut rows = self.points.list_rows().await?;
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.nrr.total_cmp(&a.nrr))
                .then(a.team_id.cmp(&b.team_id))
        });
        Ok(rows)
    }

    /// Top run scorers. Ties break by strike rate, then player id.
    pub async fn orange_cap(&self) -> Result<Vec<OrangeCapEntry>, AppError> {
        let totals = self.aggregate_totals().await?;

        let mut entries = Vec::new();
        for (player_id, t) in totals {
            if t.balls == 0 && t.runs == 0 {
                continue;
            }
            let average = if t.outs == 0 {
                f64::from(t.runs)
            } else {
                f64::from(t.runs) / f64::from(t.outs)
            };
            let strike_rate = if t.balls == 0 {
                0.0
            } else {
                f64::from(t.runs) * 100.0 / f64::from(t.balls)
            };
            entries.push(OrangeCapEntry {
                player_name: self.player_name(&player_id).await,
                player_id,
                total_runs: t.runs,
                matches: t.matches.len() as u32,
                average,
                strike_rate,
            });
        }

        entries.sort_by(|a, b| {
            b.total_runs
                .cmp(&a.total_runs)
                .then(b.strike_rate.total_cmp(&a.strike_rate))
                .then(a.player_id.cmp(&b.player_id))
        });
        Ok(entries)
    }

    /// Top wicket takers. Ties break by economy, then player id.
    pub async fn purple_cap(&self) -> Result<Vec<PurpleCapEntry>, AppError> {
        let totals = self.aggregate_totals().await?;

        let mut entries = Vec::new();
        for (player_id, t) in totals {
            if t.overs_bowled.total_balls() == 0 {
                continue;
            }
            let overs_decimal = t.overs_bowled.as_decimal();
            let economy = f64::from(t.conceded) / overs_decimal;
            let average = if t.wickets == 0 {
                0.0
            } else {
                f64::from(t.conceded) / f64::from(t.wickets)
            };
            entries.push(PurpleCapEntry {
                player_name: self.player_name(&player_id).await,
                player_id,
                total_wickets: t.wickets,
                matches: t.matches.len() as u32,
                economy,
                average,
            });
        }

        entries.sort_by(|a, b| {
            b.total_wickets
                .cmp(&a.total_wickets)
                .then(a.economy.total_cmp(&b.economy))
                .then(a.player_id.cmp(&b.player_id))
        });
        Ok(entries)
    }

    /// Weighted all-round leaderboard. Ties break by player id.
    pub async fn mvp(&self) -> Result<Vec<MvpEntry>, AppError> {
        let totals = self.aggregate_totals().await?;

        let mut entries: Vec<MvpEntry> = Vec::new();
        for (player_id, t) in totals {
            entries.push(MvpEntry {
                player_name: self.player_name(&player_id).await,
                player_id,
                mvp_points: mvp_points(t.runs, t.wickets, t.catches),
                runs: t.runs,
                wickets: t.wickets,
                catches: t.catches,
            });
        }

        entries.sort_by(|a, b| {
            b.mvp_points
                .cmp(&a.mvp_points)
                .then(a.player_id.cmp(&b.player_id))
        });
        Ok(entries)
    }

    async fn aggregate_totals(&self) -> Result<HashMap<String, PlayerTotals>, AppError> {
        let rows = self.stats.list_all_stats().await?;
        let mut totals: HashMap<String, PlayerTotals> = HashMap::new();

        for row in rows {
            let entry = totals.entry(row.player_id.clone()).or_default();
            accumulate(entry, &row);
        }
        Ok(totals)
    }

    async fn player_name(&self, player_id: &str) -> String {
        match self.players.get_player(player_id).await {
            Ok(Some(player)) => player.name,
            _ => player_id.to_string(),
        }
    }
}

fn accumulate(totals: &mut PlayerTotals, row: &PlayerMatchStats) {
    if !totals.matches.contains(&row.match_id) {
        totals.matches.push(row.match_id.clone());
    }
    totals.runs += row.runs_scored;
    totals.balls += row.balls_faced;
    if row.is_out {
        totals.outs += 1;
    }
    totals.wickets += row.wickets_taken;
    totals.overs_bowled = totals.overs_bowled.add(row.overs_bowled);
    totals.conceded += row.runs_conceded;
    totals.catches += row.catches;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::repository::InMemoryPlayerRepository;
    use crate::scoring::models::Stage;
    use crate::scoring::repository::InMemoryPlayerMatchStatsRepository;
    use crate::standings::repository::InMemoryPointsRepository;

    fn service() -> (
        StandingsService,
        Arc<InMemoryPointsRepository>,
        Arc<InMemoryPlayerMatchStatsRepository>,
    ) {
        let points = Arc::new(InMemoryPointsRepository::new());
        let stats = Arc::new(InMemoryPlayerMatchStatsRepository::new());
        let service = StandingsService::new(
            points.clone(),
            stats.clone(),
            Arc::new(InMemoryPlayerRepository::new()),
        );
        (service, points, stats)
    }

    fn completed_match(
        team1_runs: u32,
        team1_overs: Overs,
        team2_runs: u32,
        team2_overs: Overs,
        outcome: MatchOutcome,
        winner: Option<&str>,
    ) -> Match {
        let mut m = Match::new(1, "t1".to_string(), "t2".to_string(), Stage::Group, None);
        m.status = MatchStatus::Completed;
        m.team1_innings.runs = team1_runs;
        m.team1_innings.overs = team1_overs;
        m.team2_innings.runs = team2_runs;
        m.team2_innings.overs = team2_overs;
        m.outcome = Some(outcome);
        m.winner_id = winner.map(str::to_string);
        m
    }

    #[tokio::test]
    async fn win_awards_three_points_and_records_the_loss() {
        let (service, points, _) = service();
        let m = completed_match(
            120,
            Overs::new(6, 0),
            90,
            Overs::new(6, 0),
            MatchOutcome::Win,
            Some("t1"),
        );

        service.record_result(&m).await.unwrap();

        let t1 = points.get_row("t1").await.unwrap().unwrap();
        assert_eq!((t1.played, t1.won, t1.lost, t1.points), (1, 1, 0, 3));
        assert_eq!(t1.nrr, 5.0);

        let t2 = points.get_row("t2").await.unwrap().unwrap();
        assert_eq!((t2.played, t2.won, t2.lost, t2.points), (1, 0, 1, 0));
        assert_eq!(t2.nrr, -5.0);
    }

    #[tokio::test]
    async fn tie_awards_one_point_each() {
        let (service, points, _) = service();
        let m = completed_match(
            80,
            Overs::new(6, 0),
            80,
            Overs::new(6, 0),
            MatchOutcome::Tie,
            None,
        );

        service.record_result(&m).await.unwrap();

        let t1 = points.get_row("t1").await.unwrap().unwrap();
        let t2 = points.get_row("t2").await.unwrap().unwrap();
        assert_eq!((t1.tied, t1.points), (1, 1));
        assert_eq!((t2.tied, t2.points), (1, 1));
        assert_eq!(t1.nrr, 0.0);
    }

    #[tokio::test]
    async fn nrr_uses_balls_as_sixths_of_an_over() {
        let (service, points, _) = service();
        // 66 runs in 5.3 overs = 66 / 5.5 = 12 rr; conceded 60 in 6.0 = 10 rr
        let m = completed_match(
            66,
            Overs::new(5, 3),
            60,
            Overs::new(6, 0),
            MatchOutcome::Win,
            Some("t1"),
        );

        service.record_result(&m).await.unwrap();

        let t1 = points.get_row("t1").await.unwrap().unwrap();
        assert!((t1.nrr - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn results_accumulate_across_matches() {
        let (service, points, _) = service();
        let win = completed_match(
            100,
            Overs::new(6, 0),
            80,
            Overs::new(6, 0),
            MatchOutcome::Win,
            Some("t1"),
        );
        let tie = completed_match(
            90,
            Overs::new(6, 0),
            90,
            Overs::new(6, 0),
            MatchOutcome::Tie,
            None,
        );

        service.record_result(&win).await.unwrap();
        service.record_result(&tie).await.unwrap();

        let t1 = points.get_row("t1").await.unwrap().unwrap();
        assert_eq!((t1.played, t1.won, t1.tied, t1.points), (2, 1, 1, 4));
        assert_eq!(t1.runs_for, 190);
        assert_eq!(t1.overs_for, Overs::new(12, 0));
    }

    #[tokio::test]
    async fn incomplete_matches_are_rejected() {
        let (service, _, _) = service();
        let mut m = completed_match(
            1,
            Overs::new(1, 0),
            0,
            Overs::new(1, 0),
            MatchOutcome::Win,
            Some("t1"),
        );
        m.status = MatchStatus::Live;

        let result = service.record_result(&m).await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn points_table_orders_by_points_then_nrr() {
        let (service, points, _) = service();
        let mut a = PointsRow::new("a");
        a.points = 6;
        a.nrr = 1.0;
        let mut b = PointsRow::new("b");
        b.points = 6;
        b.nrr = 2.5;
        let mut c = PointsRow::new("c");
        c.points = 9;
        c.nrr = -1.0;
        for row in [&a, &b, &c] {
            points.upsert_row(row).await.unwrap();
        }

        let table = service.points_table().await.unwrap();
        let order: Vec<&str> = table.iter().map(|r| r.team_id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    fn batting_row(match_id: &str, player_id: &str, runs: u32, balls: u32, out: bool) -> PlayerMatchStats {
        let mut row = PlayerMatchStats::new(match_id, player_id, 1);
        row.runs_scored = runs;
        row.balls_faced = balls;
        row.is_out = out;
        row
    }

    #[tokio::test]
    async fn orange_cap_ranks_by_runs_with_strike_rate_tiebreak() {
        let (service, _, stats) = service();
        stats
            .upsert_stats(&batting_row("m1", "steady", 50, 50, false))
            .await
            .unwrap();
        stats
            .upsert_stats(&batting_row("m1", "quick", 50, 25, true))
            .await
            .unwrap();
        stats
            .upsert_stats(&batting_row("m1", "top", 70, 40, false))
            .await
            .unwrap();

        let leaders = service.orange_cap().await.unwrap();
        let order: Vec<&str> = leaders.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(order, vec!["top", "quick", "steady"]);

        let quick = &leaders[1];
        assert_eq!(quick.strike_rate, 200.0);
        assert_eq!(quick.average, 50.0);
    }

    #[tokio::test]
    async fn purple_cap_ranks_by_wickets_with_economy_tiebreak() {
        let (service, _, stats) = service();

        let mut miser = PlayerMatchStats::new("m1", "miser", 1);
        miser.wickets_taken = 3;
        miser.overs_bowled = Overs::new(2, 0);
        miser.runs_conceded = 8;

        let mut spender = PlayerMatchStats::new("m1", "spender", 1);
        spender.wickets_taken = 3;
        spender.overs_bowled = Overs::new(2, 0);
        spender.runs_conceded = 20;

        stats.upsert_stats(&miser).await.unwrap();
        stats.upsert_stats(&spender).await.unwrap();

        let leaders = service.purple_cap().await.unwrap();
        let order: Vec<&str> = leaders.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(order, vec!["miser", "spender"]);
        assert_eq!(leaders[0].economy, 4.0);
    }

    #[tokio::test]
    async fn mvp_weights_wickets_over_runs() {
        let (service, _, stats) = service();
        stats
            .upsert_stats(&batting_row("m1", "batter", 60, 40, false))
            .await
            .unwrap();

        let mut bowler = PlayerMatchStats::new("m1", "bowler", 1);
        bowler.wickets_taken = 4;
        bowler.overs_bowled = Overs::new(3, 0);
        bowler.runs_conceded = 15;
        stats.upsert_stats(&bowler).await.unwrap();

        let leaders = service.mvp().await.unwrap();
        assert_eq!(leaders[0].player_id, "bowler");
        assert_eq!(leaders[0].mvp_points, 80);
        assert_eq!(leaders[1].mvp_points, 60);
    }
}

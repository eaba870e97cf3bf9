use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{info, instrument};

use super::{
    engine::{Delivery, DeliveryOutcome},
    models::{BallEvent, Match, MatchRules, PlayerMatchStats, TossDecision},
    repository::{BallEventRepository, MatchRepository, PlayerMatchStatsRepository},
    stats,
};
use crate::shared::AppError;
use crate::standings::service::StandingsService;

/// Drives live matches: one atomic transition per call against the persisted
/// match row. Per-match mutexes serialize concurrent scoring of the same
/// match while leaving unrelated matches fully parallel.
pub struct ScoringService {
    matches: Arc<dyn MatchRepository>,
    events: Arc<dyn BallEventRepository>,
    stats: Arc<dyn PlayerMatchStatsRepository>,
    standings: Arc<StandingsService>,
    rules: MatchRules,
    match_mutexes: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ScoringService {
    pub fn new(
        matches: Arc<dyn MatchRepository>,
        events: Arc<dyn BallEventRepository>,
        stats: Arc<dyn PlayerMatchStatsRepository>,
        standings: Arc<StandingsService>,
    ) -> Self {
        Self {
            matches,
            events,
            stats,
            standings,
            rules: MatchRules::default(),
            match_mutexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    #[instrument(skip(self))]
    pub async fn start_match(
        &self,
        match_id: &str,
        toss_winner_id: &str,
        toss_decision: TossDecision,
    ) -> Result<Match, AppError> {
        let lock = self.match_lock(match_id).await;
        let _guard = lock.lock().await;

        let mut m = self.require_match(match_id).await?;
        m.start(toss_winner_id, toss_decision)?;
        self.matches.update_match(&m).await?;

        info!(match_id = %m.id, toss_winner = %toss_winner_id, "Match started");
        Ok(m)
    }

    /// Sets the opening pair and opens their scorecard rows for the innings.
    #[instrument(skip(self))]
    pub async fn set_batsmen(
        &self,
        match_id: &str,
        striker_id: &str,
        non_striker_id: &str,
    ) -> Result<Match, AppError> {
        let lock = self.match_lock(match_id).await;
        let _guard = lock.lock().await;

        let mut m = self.require_match(match_id).await?;
        m.set_batsmen(striker_id, non_striker_id)?;

        for player_id in [striker_id, non_striker_id] {
            self.ensure_batting_row(&m, player_id).await?;
        }

        self.matches.update_match(&m).await?;
        Ok(m)
    }

    #[instrument(skip(self))]
    pub async fn set_bowler(&self, match_id: &str, bowler_id: &str) -> Result<Match, AppError> {
        let lock = self.match_lock(match_id).await;
        let _guard = lock.lock().await;

        let mut m = self.require_match(match_id).await?;
        m.set_bowler(bowler_id)?;

        if self
            .stats
            .get_stats(&m.id, bowler_id, m.current_innings)
            .await?
            .is_none()
        {
            self.stats
                .upsert_stats(&PlayerMatchStats::new(&m.id, bowler_id, m.current_innings))
                .await?;
        }

        self.matches.update_match(&m).await?;
        Ok(m)
    }

    #[instrument(skip(self))]
    pub async fn new_batsman(
        &self,
        match_id: &str,
        player_id: &str,
        replace_striker: bool,
    ) -> Result<Match, AppError> {
        let lock = self.match_lock(match_id).await;
        let _guard = lock.lock().await;

        let mut m = self.require_match(match_id).await?;
        m.new_batsman(player_id, replace_striker)?;
        self.ensure_batting_row(&m, player_id).await?;

        self.matches.update_match(&m).await?;
        Ok(m)
    }

    #[instrument(skip(self))]
    pub async fn set_power_over(
        &self,
        match_id: &str,
        over_number: u32,
        innings: u8,
    ) -> Result<Match, AppError> {
        let lock = self.match_lock(match_id).await;
        let _guard = lock.lock().await;

        let mut m = self.require_match(match_id).await?;
        m.designate_power_over(over_number, innings, &self.rules)?;
        self.matches.update_match(&m).await?;

        info!(match_id = %m.id, over_number, innings, "Power over designated");
        Ok(m)
    }

    /// Records one delivery: applies the engine transition, appends the ball
    /// event, folds the stat deltas, and settles the standings if the match
    /// just completed.
    #[instrument(skip(self, delivery))]
    pub async fn record_ball(
        &self,
        match_id: &str,
        delivery: Delivery,
    ) -> Result<(Match, BallEvent), AppError> {
        let lock = self.match_lock(match_id).await;
        let _guard = lock.lock().await;

        let mut m = self.require_match(match_id).await?;
        let DeliveryOutcome {
            event,
            innings_ended,
            match_completed,
            ..
        } = m.apply_delivery(&delivery, &self.rules)?;

        self.events.append_event(&event).await?;
        self.fold_event_into_stats(&event).await?;
        self.matches.update_match(&m).await?;

        if innings_ended {
            info!(match_id = %m.id, innings = event.innings, "Innings complete");
        }
        if match_completed {
            self.standings.record_result(&m).await?;
            info!(match_id = %m.id, winner = ?m.winner_id, "Match complete");
        }

        Ok((m, event))
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Match, AppError> {
        self.require_match(match_id).await
    }

    pub async fn match_stats(&self, match_id: &str) -> Result<Vec<PlayerMatchStats>, AppError> {
        self.stats.list_stats_for_match(match_id).await
    }

    pub async fn match_events(&self, match_id: &str) -> Result<Vec<BallEvent>, AppError> {
        self.events.list_events(match_id).await
    }

    /// Replays the ball log into fresh stat rows. The incremental rows are a
    /// cache over the log; this is the recovery/verification path.
    pub async fn rebuild_stats(
        &self,
        match_id: &str,
    ) -> Result<Vec<PlayerMatchStats>, AppError> {
        let events = self.events.list_events(match_id).await?;
        Ok(stats::rebuild_from_events(&events).into_values().collect())
    }

    /// Applies one event's deltas through the same functions the rebuild
    /// path uses.
    async fn fold_event_into_stats(&self, event: &BallEvent) -> Result<(), AppError> {
        let mut striker_row = self
            .stats
            .get_stats(&event.match_id, &event.striker_id, event.innings)
            .await?
            .unwrap_or_else(|| {
                PlayerMatchStats::new(&event.match_id, &event.striker_id, event.innings)
            });
        stats::apply_batting(&mut striker_row, event);
        self.stats.upsert_stats(&striker_row).await?;

        let mut bowler_row = self
            .stats
            .get_stats(&event.match_id, &event.bowler_id, event.innings)
            .await?
            .unwrap_or_else(|| {
                PlayerMatchStats::new(&event.match_id, &event.bowler_id, event.innings)
            });
        stats::apply_bowling(&mut bowler_row, event);
        self.stats.upsert_stats(&bowler_row).await?;

        if let Some(fall) = &event.wicket {
            let mut dismissed_row = self
                .stats
                .get_stats(&event.match_id, &fall.player_id, event.innings)
                .await?
                .unwrap_or_else(|| {
                    PlayerMatchStats::new(&event.match_id, &fall.player_id, event.innings)
                });
            stats::apply_dismissal(&mut dismissed_row, event);
            self.stats.upsert_stats(&dismissed_row).await?;
        }

        Ok(())
    }

    async fn ensure_batting_row(&self, m: &Match, player_id: &str) -> Result<(), AppError> {
        if self
            .stats
            .get_stats(&m.id, player_id, m.current_innings)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let order = &m.batting_order[m.current_innings as usize - 1];
        let mut row = PlayerMatchStats::new(&m.id, player_id, m.current_innings);
        row.batting_position = order
            .iter()
            .position(|id| id == player_id)
            .map(|index| index as u32 + 1);
        self.stats.upsert_stats(&row).await
    }

    async fn require_match(&self, match_id: &str) -> Result<Match, AppError> {
        self.matches
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Match not found: {}", match_id)))
    }

    async fn match_lock(&self, match_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.match_mutexes.read().await;
            if let Some(lock) = guard.get(match_id) {
                return lock.clone();
            }
        }

        let mut guard = self.match_mutexes.write().await;
        guard
            .entry(match_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::repository::InMemoryPlayerRepository;
    use crate::scoring::models::{ExtraType, MatchStatus, Stage, WicketType};
    use crate::scoring::overs::Overs;
    use crate::scoring::repository::{
        InMemoryBallEventRepository, InMemoryMatchRepository, InMemoryPlayerMatchStatsRepository,
    };
    use crate::standings::repository::{InMemoryPointsRepository, PointsRepository};

    struct Fixture {
        service: ScoringService,
        matches: Arc<InMemoryMatchRepository>,
        points: Arc<InMemoryPointsRepository>,
    }

    fn fixture() -> Fixture {
        let matches = Arc::new(InMemoryMatchRepository::new());
        let events = Arc::new(InMemoryBallEventRepository::new());
        let stats = Arc::new(InMemoryPlayerMatchStatsRepository::new());
        let points = Arc::new(InMemoryPointsRepository::new());
        let standings = Arc::new(StandingsService::new(
            points.clone(),
            stats.clone(),
            Arc::new(InMemoryPlayerRepository::new()),
        ));
        let service = ScoringService::new(matches.clone(), events, stats, standings);
        Fixture {
            service,
            matches,
            points,
        }
    }

    async fn live_match(f: &Fixture) -> Match {
        let m = Match::new(1, "t1".to_string(), "t2".to_string(), Stage::Group, None);
        f.matches.create_match(&m).await.unwrap();
        f.service
            .start_match(&m.id, "t1", TossDecision::Bat)
            .await
            .unwrap();
        f.service.set_batsmen(&m.id, "bat-a", "bat-b").await.unwrap();
        f.service.set_bowler(&m.id, "bowl-x").await.unwrap();
        f.service.get_match(&m.id).await.unwrap()
    }

    fn runs(n: u32) -> Delivery {
        Delivery {
            runs: n,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn set_batsmen_opens_scorecard_rows_with_positions() {
        let f = fixture();
        let m = live_match(&f).await;

        let rows = f.service.match_stats(&m.id).await.unwrap();
        assert_eq!(rows.len(), 3); // two batters and the bowler

        let striker = rows
            .iter()
            .find(|r| r.player_id == "bat-a")
            .unwrap();
        assert_eq!(striker.batting_position, Some(1));
        let non_striker = rows.iter().find(|r| r.player_id == "bat-b").unwrap();
        assert_eq!(non_striker.batting_position, Some(2));
    }

    #[tokio::test]
    async fn record_ball_updates_match_event_log_and_stats_together() {
        let f = fixture();
        let m = live_match(&f).await;

        let (updated, event) = f.service.record_ball(&m.id, runs(4)).await.unwrap();
        assert_eq!(updated.team1_innings.runs, 4);
        assert_eq!(event.actual_runs, 4);

        let events = f.service.match_events(&m.id).await.unwrap();
        assert_eq!(events.len(), 1);

        let rows = f.service.match_stats(&m.id).await.unwrap();
        let striker = rows.iter().find(|r| r.player_id == "bat-a").unwrap();
        assert_eq!(striker.runs_scored, 4);
        assert_eq!(striker.fours, 1);
        let bowler = rows.iter().find(|r| r.player_id == "bowl-x").unwrap();
        assert_eq!(bowler.runs_conceded, 4);
        assert_eq!(bowler.overs_bowled, Overs::new(0, 1));
    }

    #[tokio::test]
    async fn failed_preconditions_leave_no_trace() {
        let f = fixture();
        let m = Match::new(1, "t1".to_string(), "t2".to_string(), Stage::Group, None);
        f.matches.create_match(&m).await.unwrap();

        // Match is still scheduled
        let result = f.service.record_ball(&m.id, runs(1)).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

        assert!(f.service.match_events(&m.id).await.unwrap().is_empty());
        assert!(f.service.match_stats(&m.id).await.unwrap().is_empty());
        let stored = f.service.get_match(&m.id).await.unwrap();
        assert_eq!(stored.status, MatchStatus::Scheduled);
    }

    #[tokio::test]
    async fn dismissals_in_stats_match_wicket_events() {
        let f = fixture();
        let m = live_match(&f).await;

        f.service.record_ball(&m.id, runs(1)).await.unwrap();
        f.service
            .record_ball(
                &m.id,
                Delivery {
                    runs: 0,
                    wicket: Some(WicketType::Bowled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        f.service.new_batsman(&m.id, "bat-c", true).await.unwrap();
        f.service
            .record_ball(
                &m.id,
                Delivery {
                    runs: 1,
                    extra: Some(ExtraType::NoBall),
                    wicket: Some(WicketType::RunOut),
                    dismissed_player_id: Some("bat-a".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let events = f.service.match_events(&m.id).await.unwrap();
        let wicket_events = events.iter().filter(|e| e.wicket.is_some()).count();

        let rows = f.service.match_stats(&m.id).await.unwrap();
        let out_rows = rows.iter().filter(|r| r.is_out).count();
        assert_eq!(wicket_events, 2);
        assert_eq!(out_rows, wicket_events);

        let stored = f.service.get_match(&m.id).await.unwrap();
        assert_eq!(stored.team1_innings.wickets, 2);
    }

    #[tokio::test]
    async fn incremental_stats_equal_a_rebuild_from_the_log() {
        let f = fixture();
        let m = live_match(&f).await;

        f.service.record_ball(&m.id, runs(4)).await.unwrap();
        f.service.record_ball(&m.id, runs(1)).await.unwrap();
        f.service
            .record_ball(
                &m.id,
                Delivery {
                    runs: 2,
                    extra: Some(ExtraType::Wide),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        f.service
            .record_ball(
                &m.id,
                Delivery {
                    runs: 0,
                    wicket: Some(WicketType::Caught),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let incremental = f.service.match_stats(&m.id).await.unwrap();
        let rebuilt = f.service.rebuild_stats(&m.id).await.unwrap();

        for row in &rebuilt {
            let live = incremental
                .iter()
                .find(|r| r.player_id == row.player_id && r.innings == row.innings)
                .expect("incremental row missing");
            assert_eq!(live.runs_scored, row.runs_scored, "{}", row.player_id);
            assert_eq!(live.balls_faced, row.balls_faced);
            assert_eq!(live.fours, row.fours);
            assert_eq!(live.sixes, row.sixes);
            assert_eq!(live.overs_bowled, row.overs_bowled);
            assert_eq!(live.runs_conceded, row.runs_conceded);
            assert_eq!(live.wickets_taken, row.wickets_taken);
            assert_eq!(live.is_out, row.is_out);
        }
    }

    #[tokio::test]
    async fn completing_a_chase_settles_the_points_table() {
        let f = fixture();
        let m = live_match(&f).await;

        // Fast-forward: first innings done, 5 to win off the chase
        let mut stored = f.service.get_match(&m.id).await.unwrap();
        stored.team1_innings.runs = 4;
        stored.team1_innings.overs = Overs::new(6, 0);
        stored.current_innings = 2;
        stored.striker_id = None;
        stored.non_striker_id = None;
        stored.current_bowler_id = None;
        f.matches.update_match(&stored).await.unwrap();

        f.service.set_batsmen(&m.id, "bat-p", "bat-q").await.unwrap();
        f.service.set_bowler(&m.id, "bowl-z").await.unwrap();

        let (updated, _) = f.service.record_ball(&m.id, runs(6)).await.unwrap();
        assert_eq!(updated.status, MatchStatus::Completed);
        assert_eq!(updated.winner_id.as_deref(), Some("t2"));

        let winner_row = f.points.get_row("t2").await.unwrap().unwrap();
        assert_eq!((winner_row.played, winner_row.won, winner_row.points), (1, 1, 3));
        let loser_row = f.points.get_row("t1").await.unwrap().unwrap();
        assert_eq!((loser_row.played, loser_row.lost, loser_row.points), (1, 1, 0));
    }

    #[tokio::test]
    async fn power_over_can_only_target_valid_overs() {
        let f = fixture();
        let m = live_match(&f).await;

        let result = f.service.set_power_over(&m.id, 9, 1).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

        f.service.set_power_over(&m.id, 3, 2).await.unwrap();
        let stored = f.service.get_match(&m.id).await.unwrap();
        assert_eq!(
            stored.power_over,
            Some(crate::scoring::models::PowerOver {
                innings: 2,
                over_number: 3
            })
        );
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let f = fixture();
        let result = f.service.record_ball("missing", runs(1)).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }
}

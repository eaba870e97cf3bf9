use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{BallEvent, Match, PlayerMatchStats};
use crate::shared::AppError;

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, m: &Match) -> Result<(), AppError>;
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, AppError>;
    async fn list_matches(&self) -> Result<Vec<Match>, AppError>;
    async fn update_match(&self, m: &Match) -> Result<(), AppError>;
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError>;
}

/// Append-only store for the delivery audit log. Events are returned in
/// recording order.
#[async_trait]
pub trait BallEventRepository: Send + Sync {
    async fn append_event(&self, event: &BallEvent) -> Result<(), AppError>;
    async fn list_events(&self, match_id: &str) -> Result<Vec<BallEvent>, AppError>;
}

#[async_trait]
pub trait PlayerMatchStatsRepository: Send + Sync {
    async fn get_stats(
        &self,
        match_id: &str,
        player_id: &str,
        innings: u8,
    ) -> Result<Option<PlayerMatchStats>, AppError>;
    async fn upsert_stats(&self, stats: &PlayerMatchStats) -> Result<(), AppError>;
    async fn list_stats_for_match(&self, match_id: &str) -> Result<Vec<PlayerMatchStats>, AppError>;
    async fn list_all_stats(&self) -> Result<Vec<PlayerMatchStats>, AppError>;
}

/// In-memory implementation of MatchRepository for development and testing
pub struct InMemoryMatchRepository {
    matches: Mutex<Vec<Match>>,
}

impl Default for InMemoryMatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self, m))]
    async fn create_match(&self, m: &Match) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        if matches.iter().any(|existing| existing.id == m.id) {
            warn!(match_id = %m.id, "Match already exists in memory");
            return Err(AppError::Conflict("Match already exists".to_string()));
        }
        matches.push(m.clone());

        debug!(match_id = %m.id, "Match created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, AppError> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.iter().find(|m| m.id == match_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<Match>, AppError> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.clone())
    }

    #[instrument(skip(self, m))]
    async fn update_match(&self, m: &Match) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        match matches.iter_mut().find(|existing| existing.id == m.id) {
            Some(slot) => {
                *slot = m.clone();
                Ok(())
            }
            None => {
                warn!(match_id = %m.id, "Match not found for update in memory");
                Err(AppError::NotFound("Match not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: &str) -> Result<(), AppError> {
        let mut matches = self.matches.lock().unwrap();
        let before = matches.len();
        matches.retain(|m| m.id != match_id);
        if matches.len() == before {
            return Err(AppError::NotFound("Match not found".to_string()));
        }
        Ok(())
    }
}

/// In-memory implementation of BallEventRepository for development and testing
pub struct InMemoryBallEventRepository {
    events: Mutex<Vec<BallEvent>>,
}

impl Default for InMemoryBallEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBallEventRepository {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BallEventRepository for InMemoryBallEventRepository {
    #[instrument(skip(self, event))]
    async fn append_event(&self, event: &BallEvent) -> Result<(), AppError> {
        let mut events = self.events.lock().unwrap();
        events.push(event.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_events(&self, match_id: &str) -> Result<Vec<BallEvent>, AppError> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| e.match_id == match_id)
            .cloned()
            .collect())
    }
}

/// In-memory implementation of PlayerMatchStatsRepository for development and testing
pub struct InMemoryPlayerMatchStatsRepository {
    rows: Mutex<Vec<PlayerMatchStats>>,
}

impl Default for InMemoryPlayerMatchStatsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerMatchStatsRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlayerMatchStatsRepository for InMemoryPlayerMatchStatsRepository {
    #[instrument(skip(self))]
    async fn get_stats(
        &self,
        match_id: &str,
        player_id: &str,
        innings: u8,
    ) -> Result<Option<PlayerMatchStats>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.match_id == match_id && r.player_id == player_id && r.innings == innings)
            .cloned())
    }

    #[instrument(skip(self, stats))]
    async fn upsert_stats(&self, stats: &PlayerMatchStats) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| {
            r.match_id == stats.match_id
                && r.player_id == stats.player_id
                && r.innings == stats.innings
        }) {
            Some(slot) => *slot = stats.clone(),
            None => rows.push(stats.clone()),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_stats_for_match(
        &self,
        match_id: &str,
    ) -> Result<Vec<PlayerMatchStats>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.match_id == match_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_all_stats(&self) -> Result<Vec<PlayerMatchStats>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.clone())
    }
}

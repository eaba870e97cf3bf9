use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{Player, Team};
use crate::shared::AppError;

/// Trait for player storage.
///
/// `list` returns players in registration order; the auction engine relies on
/// that order when picking the next player of a tier, so implementations must
/// preserve insertion order.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create_player(&self, player: &Player) -> Result<(), AppError>;
    async fn get_player(&self, player_id: &str) -> Result<Option<Player>, AppError>;
    async fn list_players(&self) -> Result<Vec<Player>, AppError>;
    async fn update_player(&self, player: &Player) -> Result<(), AppError>;
    async fn delete_player(&self, player_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create_team(&self, team: &Team) -> Result<(), AppError>;
    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, AppError>;
    async fn list_teams(&self) -> Result<Vec<Team>, AppError>;
    async fn update_team(&self, team: &Team) -> Result<(), AppError>;
}

/// In-memory implementation of PlayerRepository for development and testing
pub struct InMemoryPlayerRepository {
    players: Mutex<Vec<Player>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create_player(&self, player: &Player) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        if players.iter().any(|p| p.id == player.id) {
            warn!(player_id = %player.id, "Player already exists in memory");
            return Err(AppError::Conflict("Player already exists".to_string()));
        }
        players.push(player.clone());

        debug!(player_id = %player.id, "Player created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<Player>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.iter().find(|p| p.id == player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        let players = self.players.lock().unwrap();
        Ok(players.clone())
    }

    #[instrument(skip(self, player))]
    async fn update_player(&self, player: &Player) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        match players.iter_mut().find(|p| p.id == player.id) {
            Some(slot) => {
                *slot = player.clone();
                Ok(())
            }
            None => {
                warn!(player_id = %player.id, "Player not found for update in memory");
                Err(AppError::NotFound("Player not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: &str) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        let before = players.len();
        players.retain(|p| p.id != player_id);
        if players.len() == before {
            return Err(AppError::NotFound("Player not found".to_string()));
        }
        Ok(())
    }
}

/// In-memory implementation of TeamRepository for development and testing
pub struct InMemoryTeamRepository {
    teams: Mutex<Vec<Team>>,
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &Team) -> Result<(), AppError> {
        let mut teams = self.teams.lock().unwrap();
        if teams.iter().any(|t| t.id == team.id) {
            warn!(team_id = %team.id, "Team already exists in memory");
            return Err(AppError::Conflict("Team already exists".to_string()));
        }
        teams.push(team.clone());

        debug!(team_id = %team.id, "Team created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.iter().find(|t| t.id == team_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.clone())
    }

    #[instrument(skip(self, team))]
    async fn update_team(&self, team: &Team) -> Result<(), AppError> {
        let mut teams = self.teams.lock().unwrap();
        match teams.iter_mut().find(|t| t.id == team.id) {
            Some(slot) => {
                *slot = team.clone();
                Ok(())
            }
            None => {
                warn!(team_id = %team.id, "Team not found for update in memory");
                Err(AppError::NotFound("Team not found".to_string()))
            }
        }
    }
}

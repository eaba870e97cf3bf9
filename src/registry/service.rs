use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{ApprovalStatus, PaymentStatus, Player, Team, TierSchedule},
    repository::{PlayerRepository, TeamRepository},
    types::{PlayerRegistration, TeamCreateRequest, TeamUpdateRequest},
};
use crate::shared::AppError;

/// Service for player registration, the approval workflow and team records.
pub struct RegistryService {
    players: Arc<dyn PlayerRepository>,
    teams: Arc<dyn TeamRepository>,
    schedule: TierSchedule,
}

impl RegistryService {
    pub fn new(players: Arc<dyn PlayerRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self {
            players,
            teams,
            schedule: TierSchedule::default(),
        }
    }

    #[instrument(skip(self, registration))]
    pub async fn register_player(
        &self,
        registration: PlayerRegistration,
    ) -> Result<Player, AppError> {
        if registration.name.trim().len() < 2 {
            return Err(AppError::Validation(
                "Name must be at least 2 characters".to_string(),
            ));
        }
        if registration.mobile.len() != 10 || !registration.mobile.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AppError::Validation("Mobile must be 10 digits".to_string()));
        }
        for rating in [
            registration.batting_rating,
            registration.bowling_rating,
            registration.fielding_rating,
        ] {
            if !(1..=10).contains(&rating) {
                return Err(AppError::Validation(
                    "Ratings must be between 1 and 10".to_string(),
                ));
            }
        }

        let existing = self.players.list_players().await?;
        if existing.iter().any(|p| p.mobile == registration.mobile) {
            return Err(AppError::Validation(
                "Mobile number already registered".to_string(),
            ));
        }

        let player = Player::new(
            registration.name.trim().to_string(),
            registration.mobile,
            registration.role,
            registration.batting_rating,
            registration.bowling_rating,
            registration.fielding_rating,
        );
        self.players.create_player(&player).await?;

        info!(player_id = %player.id, name = %player.name, "Player registered");
        Ok(player)
    }

    /// Approves a player and locks in their tier from the summed skill
    /// ratings. The tier is computed exactly once; re-approving keeps it.
    #[instrument(skip(self))]
    pub async fn approve_player(&self, player_id: &str) -> Result<Player, AppError> {
        let mut player = self.require_player(player_id).await?;

        let tier = match player.tier {
            Some(existing) => existing,
            None => self.schedule.tier_for_rating(player.total_rating()),
        };
        player.tier = Some(tier);
        player.approval = ApprovalStatus::Approved;
        self.players.update_player(&player).await?;

        info!(player_id = %player.id, tier = %tier, "Player approved");
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn reject_player(&self, player_id: &str) -> Result<Player, AppError> {
        let mut player = self.require_player(player_id).await?;
        player.approval = ApprovalStatus::Rejected;
        self.players.update_player(&player).await?;
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn verify_payment(&self, player_id: &str) -> Result<Player, AppError> {
        let mut player = self.require_player(player_id).await?;
        player.payment = PaymentStatus::Verified;
        self.players.update_player(&player).await?;

        info!(player_id = %player.id, "Payment verified");
        Ok(player)
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Player, AppError> {
        self.require_player(player_id).await
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        self.players.list_players().await
    }

    pub async fn delete_player(&self, player_id: &str) -> Result<(), AppError> {
        self.players.delete_player(player_id).await
    }

    #[instrument(skip(self, request))]
    pub async fn create_team(&self, request: TeamCreateRequest) -> Result<Team, AppError> {
        if request.name.trim().is_empty() || request.short_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Team name and short name are required".to_string(),
            ));
        }

        let team = Team::new(
            request.name,
            request.short_name,
            request.primary_color,
            request.secondary_color,
            request.budget,
        );
        self.teams.create_team(&team).await?;

        info!(team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    #[instrument(skip(self, request))]
    pub async fn update_team(
        &self,
        team_id: &str,
        request: TeamUpdateRequest,
    ) -> Result<Team, AppError> {
        let mut team = self
            .teams
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team not found: {}", team_id)))?;

        if let Some(name) = request.name {
            team.name = name;
        }
        if let Some(short_name) = request.short_name {
            team.short_name = short_name;
        }
        if let Some(primary) = request.primary_color {
            team.primary_color = primary;
        }
        if let Some(secondary) = request.secondary_color {
            team.secondary_color = secondary;
        }
        if let Some(group) = request.group_name {
            team.group_name = Some(group);
        }

        self.teams.update_team(&team).await?;
        Ok(team)
    }

    pub async fn get_team(&self, team_id: &str) -> Result<Team, AppError> {
        self.teams
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team not found: {}", team_id)))
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.teams.list_teams().await
    }

    async fn require_player(&self, player_id: &str) -> Result<Player, AppError> {
        self.players
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player not found: {}", player_id)))
    }
}

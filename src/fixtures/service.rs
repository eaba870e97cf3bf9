use rand::seq::SliceRandom;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, instrument};

use crate::registry::models::{Group, Team};
use crate::registry::repository::TeamRepository;
use crate::scoring::models::{Match, Stage};
use crate::scoring::repository::MatchRepository;
use crate::shared::AppError;

const TEAMS_PER_GROUP: usize = 3;

/// Builds the tournament schedule: group draws, round-robin group fixtures
/// and the knockout matches.
pub struct FixturesService {
    teams: Arc<dyn TeamRepository>,
    matches: Arc<dyn MatchRepository>,
}

impl FixturesService {
    pub fn new(teams: Arc<dyn TeamRepository>, matches: Arc<dyn MatchRepository>) -> Self {
        Self { teams, matches }
    }

    #[instrument(skip(self))]
    pub async fn create_match(
        &self,
        team1_id: &str,
        team2_id: &str,
        stage: Stage,
        group_name: Option<Group>,
    ) -> Result<Match, AppError> {
        if team1_id == team2_id {
            return Err(AppError::Validation(
                "A team cannot play against itself".to_string(),
            ));
        }
        for team_id in [team1_id, team2_id] {
            if self.teams.get_team(team_id).await?.is_none() {
                return Err(AppError::NotFound(format!("Team not found: {}", team_id)));
            }
        }

        let match_number = self.matches.list_matches().await?.len() as u32 + 1;
        let m = Match::new(
            match_number,
            team1_id.to_string(),
            team2_id.to_string(),
            stage,
            group_name,
        );
        self.matches.create_match(&m).await?;

        info!(match_id = %m.id, match_number, "Match created");
        Ok(m)
    }

    /// Shuffles every team into a group and regenerates the group-stage
    /// round robin from scratch. Existing fixtures are discarded.
    #[instrument(skip(self))]
    pub async fn assign_groups(&self) -> Result<Vec<Team>, AppError> {
        let mut teams = self.teams.list_teams().await?;
        teams.shuffle(&mut rand::rng());

        let groups: Vec<Group> = Group::iter().collect();
        for (index, team) in teams.iter_mut().enumerate() {
            let group_index = index / TEAMS_PER_GROUP;
            if let Some(group) = groups.get(group_index) {
                team.group_name = Some(*group);
                self.teams.update_team(team).await?;
            }
        }

        for stale in self.matches.list_matches().await? {
            self.matches.delete_match(&stale.id).await?;
        }

        let assigned = self.teams.list_teams().await?;
        let mut match_number = 1;
        for group in &groups {
            let group_teams: Vec<&Team> = assigned
                .iter()
                .filter(|t| t.group_name == Some(*group))
                .collect();
            for i in 0..group_teams.len() {
                for j in (i + 1)..group_teams.len() {
                    let m = Match::new(
                        match_number,
                        group_teams[i].id.clone(),
                        group_teams[j].id.clone(),
                        Stage::Group,
                        Some(*group),
                    );
                    self.matches.create_match(&m).await?;
                    match_number += 1;
                }
            }
        }

        info!(fixtures = match_number - 1, "Groups assigned and fixtures generated");
        Ok(assigned)
    }

    #[instrument(skip(self))]
    pub async fn create_semifinals(
        &self,
        semifinal1: (&str, &str),
        semifinal2: (&str, &str),
    ) -> Result<Vec<Match>, AppError> {
        let first = self
            .create_match(semifinal1.0, semifinal1.1, Stage::Semifinal, None)
            .await?;
        let second = self
            .create_match(semifinal2.0, semifinal2.1, Stage::Semifinal, None)
            .await?;
        Ok(vec![first, second])
    }

    #[instrument(skip(self))]
    pub async fn create_final(&self, team1_id: &str, team2_id: &str) -> Result<Match, AppError> {
        self.create_match(team1_id, team2_id, Stage::Final, None)
            .await
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Match, AppError> {
        self.matches
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Match not found: {}", match_id)))
    }

    pub async fn list_matches(&self) -> Result<Vec<Match>, AppError> {
        self.matches.list_matches().await
    }
}

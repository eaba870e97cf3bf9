use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, instrument};

use super::{
    repository::AuctionStateRepository,
    rules::AuctionRules,
    state::{AuctionError, AuctionState, AuctionStatus},
};
use crate::registry::models::{Player, PlayerStatus, Tier};
use crate::registry::repository::{PlayerRepository, TeamRepository};
use crate::shared::AppError;

/// Orchestrates the auction state machine over the player and team records.
///
/// Every mutating operation takes the write lock first, so concurrent calls
/// against the singleton are serialized into clean read-modify-write cycles.
pub struct AuctionService {
    state_repo: Arc<dyn AuctionStateRepository>,
    players: Arc<dyn PlayerRepository>,
    teams: Arc<dyn TeamRepository>,
    rules: AuctionRules,
    write_lock: AsyncMutex<()>,
}

/// First player of `tier` still in the primary pool, in registration order.
fn first_in_primary_pool(players: &[Player], tier: Tier) -> Option<&Player> {
    players.iter().find(|p| {
        p.status == PlayerStatus::Registered && p.is_auction_eligible() && p.tier == Some(tier)
    })
}

/// First lost-gold player in registration order, any tier.
fn first_in_lost_gold_pool(players: &[Player]) -> Option<&Player> {
    players
        .iter()
        .find(|p| p.status == PlayerStatus::LostGold && p.is_auction_eligible())
}

impl AuctionService {
    pub fn new(
        state_repo: Arc<dyn AuctionStateRepository>,
        players: Arc<dyn PlayerRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            state_repo,
            players,
            teams,
            rules: AuctionRules::default(),
            write_lock: AsyncMutex::new(()),
        }
    }

    pub async fn get_state(&self) -> Result<AuctionState, AppError> {
        self.state_repo.load().await
    }

    /// Opens the auction on the first eligible player of `tier`.
    #[instrument(skip(self))]
    pub async fn start(&self, tier: Tier) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        if state.status != AuctionStatus::NotStarted {
            return Err(AuctionError::AlreadyStarted.into());
        }

        let players = self.players.list_players().await?;
        let player = first_in_primary_pool(&players, tier)
            .cloned()
            .ok_or(AuctionError::NoEligiblePlayers(tier))?;

        self.set_player_status(&player.id, PlayerStatus::InAuction)
            .await?;
        state.open_lot(
            &player.id,
            tier,
            self.rules.base_price(tier),
            AuctionStatus::InProgress,
        );
        self.state_repo.save(&state).await?;

        info!(player_id = %player.id, tier = %tier, "Auction started");
        Ok(state)
    }

    #[instrument(skip(self))]
    pub async fn place_bid(&self, team_id: &str) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        let team = self
            .teams
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team not found: {}", team_id)))?;

        let new_bid = state.apply_bid(&team, &self.rules, Utc::now())?;
        self.state_repo.save(&state).await?;

        info!(team_id = %team.id, amount = new_bid, "Bid placed");
        Ok(state)
    }

    #[instrument(skip(self))]
    pub async fn undo_bid(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        let tier = state.current_tier.ok_or(AuctionError::NoCurrentPlayer)?;
        state.undo_bid(self.rules.base_price(tier))?;
        self.state_repo.save(&state).await?;

        Ok(state)
    }

    /// Sells the current player to the leading team, decrements that team's
    /// budget and advances to the next lot.
    #[instrument(skip(self))]
    pub async fn sell(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        let player_id = state
            .current_player_id
            .clone()
            .ok_or(AuctionError::NoCurrentPlayer)?;
        let team_id = state
            .current_bidding_team_id
            .clone()
            .ok_or(AuctionError::NoBiddingTeam)?;
        let price = state.current_bid.ok_or(AuctionError::NoCurrentPlayer)?;

        let mut team = self
            .teams
            .get_team(&team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team not found: {}", team_id)))?;
        let mut player = self
            .players
            .get_player(&player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player not found: {}", player_id)))?;

        team.remaining_budget = team.remaining_budget.checked_sub(price).ok_or_else(|| {
            AppError::Conflict(format!(
                "Sale of {} would overdraw team {}",
                price, team.id
            ))
        })?;

        player.status = PlayerStatus::Sold;
        player.team_id = Some(team_id.clone());
        player.sold_price = Some(price);
        player.is_locked = true;

        self.players.update_player(&player).await?;
        self.teams.update_team(&team).await?;

        info!(
            player_id = %player.id,
            team_id = %team.id,
            price,
            "Player sold"
        );

        self.advance_lot(&mut state).await?;
        self.state_repo.save(&state).await?;
        Ok(state)
    }

    /// Marks the current player unsold. In the primary round the player drops
    /// into the lost-gold pool for a second pass; in the lost-gold round the
    /// player is permanently unsold.
    #[instrument(skip(self))]
    pub async fn mark_unsold(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        let player_id = state
            .current_player_id
            .clone()
            .ok_or(AuctionError::NoCurrentPlayer)?;

        let next_status = if state.status == AuctionStatus::LostGoldRound {
            PlayerStatus::Unsold
        } else {
            PlayerStatus::LostGold
        };
        self.set_player_status(&player_id, next_status).await?;

        info!(player_id = %player_id, ?next_status, "Player not sold");

        self.advance_lot(&mut state).await?;
        self.state_repo.save(&state).await?;
        Ok(state)
    }

    /// Admin override: abandon the current lot (the player returns to their
    /// pool), optionally switch tier, and move on to the next eligible player.
    #[instrument(skip(self))]
    pub async fn next(&self, tier: Option<Tier>) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        if !state.bidding_open() {
            return Err(AuctionError::BiddingClosed.into());
        }

        if let Some(player_id) = state.current_player_id.clone() {
            let pool_status = if state.status == AuctionStatus::LostGoldRound {
                PlayerStatus::LostGold
            } else {
                PlayerStatus::Registered
            };
            self.set_player_status(&player_id, pool_status).await?;
        }
        if let Some(tier) = tier {
            state.current_tier = Some(tier);
        }

        self.advance_lot(&mut state).await?;
        self.state_repo.save(&state).await?;
        Ok(state)
    }

    /// Pre-selects the tier to auction next. Only allowed between lots.
    #[instrument(skip(self))]
    pub async fn select_tier(&self, tier: Tier) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        if state.current_player_id.is_some() {
            return Err(AuctionError::LotInProgress.into());
        }

        state.current_tier = Some(tier);
        self.state_repo.save(&state).await?;
        Ok(state)
    }

    #[instrument(skip(self))]
    pub async fn pause(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        if state.status != AuctionStatus::InProgress {
            return Err(AuctionError::NotInProgress.into());
        }
        state.status = AuctionStatus::Paused;
        self.state_repo.save(&state).await?;
        Ok(state)
    }

    #[instrument(skip(self))]
    pub async fn resume(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        if state.status != AuctionStatus::Paused {
            return Err(AuctionError::NotPaused.into());
        }
        state.status = AuctionStatus::InProgress;
        self.state_repo.save(&state).await?;
        Ok(state)
    }

    /// Ends the auction. A live player (if any) returns to their pool rather
    /// than staying stranded in the in-auction status.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut state = self.state_repo.load().await?;

        if let Some(player_id) = state.current_player_id.clone() {
            let pool_status = if state.status == AuctionStatus::LostGoldRound {
                PlayerStatus::LostGold
            } else {
                PlayerStatus::Registered
            };
            self.set_player_status(&player_id, pool_status).await?;
        }

        state.complete();
        self.state_repo.save(&state).await?;

        info!("Auction stopped");
        Ok(state)
    }

    /// Full rollback: every player returns to the registered pool with no
    /// team, every budget is restored, and the state machine starts over.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<AuctionState, AppError> {
        let _guard = self.write_lock.lock().await;

        for mut player in self.players.list_players().await? {
            player.status = PlayerStatus::Registered;
            player.team_id = None;
            player.sold_price = None;
            player.is_locked = false;
            self.players.update_player(&player).await?;
        }

        for mut team in self.teams.list_teams().await? {
            team.remaining_budget = team.budget;
            self.teams.update_team(&team).await?;
        }

        let state = AuctionState::new();
        self.state_repo.save(&state).await?;

        info!("Auction reset");
        Ok(state)
    }

    /// Moves the state machine to the next lot: the current tier's primary
    /// pool first (unless already in the lost-gold round), then the lost-gold
    /// pool, then completion.
    async fn advance_lot(&self, state: &mut AuctionState) -> Result<(), AppError> {
        let players = self.players.list_players().await?;

        if state.status != AuctionStatus::LostGoldRound {
            if let Some(next) = state
                .current_tier
                .and_then(|tier| first_in_primary_pool(&players, tier))
                .cloned()
            {
                let tier = next.tier.ok_or(AppError::Internal)?;
                self.set_player_status(&next.id, PlayerStatus::InAuction)
                    .await?;
                state.open_lot(
                    &next.id,
                    tier,
                    self.rules.base_price(tier),
                    AuctionStatus::InProgress,
                );
                return Ok(());
            }
        }

        if let Some(next) = first_in_lost_gold_pool(&players).cloned() {
            let tier = next.tier.ok_or(AppError::Internal)?;
            self.set_player_status(&next.id, PlayerStatus::InAuction)
                .await?;
            state.open_lot(
                &next.id,
                tier,
                self.rules.base_price(tier),
                AuctionStatus::LostGoldRound,
            );
            info!(player_id = %next.id, "Entering lost-gold lot");
            return Ok(());
        }

        state.complete();
        info!("Auction pools exhausted, auction completed");
        Ok(())
    }

    async fn set_player_status(
        &self,
        player_id: &str,
        status: PlayerStatus,
    ) -> Result<(), AppError> {
        let mut player = self
            .players
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player not found: {}", player_id)))?;
        player.status = status;
        self.players.update_player(&player).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::repository::InMemoryAuctionStateRepository;
    use crate::registry::models::{ApprovalStatus, PaymentStatus, PlayerRole, Team};
    use crate::registry::repository::{InMemoryPlayerRepository, InMemoryTeamRepository};

    struct Fixture {
        service: Arc<AuctionService>,
        players: Arc<InMemoryPlayerRepository>,
        teams: Arc<InMemoryTeamRepository>,
    }

    fn fixture() -> Fixture {
        let players = Arc::new(InMemoryPlayerRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());
        let service = Arc::new(AuctionService::new(
            Arc::new(InMemoryAuctionStateRepository::new()),
            players.clone(),
            teams.clone(),
        ));
        Fixture {
            service,
            players,
            teams,
        }
    }

    async fn seed_player(repo: &InMemoryPlayerRepository, name: &str, tier: Tier) -> Player {
        let mut player = Player::new(
            name.to_string(),
            format!("55500{:05}", rand_suffix(name)),
            PlayerRole::AllRounder,
            8,
            8,
            8,
        );
        player.tier = Some(tier);
        player.approval = ApprovalStatus::Approved;
        player.payment = PaymentStatus::Verified;
        repo.create_player(&player).await.unwrap();
        player
    }

    fn rand_suffix(name: &str) -> u32 {
        name.bytes().map(u32::from).sum::<u32>() % 100000
    }

    async fn seed_team(repo: &InMemoryTeamRepository, name: &str, budget: u32) -> Team {
        let team = Team::new(
            name.to_string(),
            name[..3.min(name.len())].to_uppercase(),
            "#ff6b35".to_string(),
            "#1a1a1a".to_string(),
            budget,
        );
        repo.create_team(&team).await.unwrap();
        team
    }

    #[tokio::test]
    async fn start_bid_bid_sell_scenario() {
        let f = fixture();
        let player = seed_player(&f.players, "Solo Star", Tier::Superstar).await;
        let team_a = seed_team(&f.teams, "Alpha", 30000).await;
        let team_b = seed_team(&f.teams, "Bravo", 30000).await;

        let state = f.service.start(Tier::Superstar).await.unwrap();
        assert_eq!(state.status, AuctionStatus::InProgress);
        assert_eq!(state.current_bid, Some(3000));
        assert_eq!(state.current_player_id.as_deref(), Some(player.id.as_str()));

        let state = f.service.place_bid(&team_a.id).await.unwrap();
        assert_eq!(state.current_bid, Some(3100));

        let state = f.service.place_bid(&team_b.id).await.unwrap();
        assert_eq!(state.current_bid, Some(3200));

        let state = f.service.sell().await.unwrap();

        let sold = f.players.get_player(&player.id).await.unwrap().unwrap();
        assert_eq!(sold.status, PlayerStatus::Sold);
        assert_eq!(sold.sold_price, Some(3200));
        assert_eq!(sold.team_id.as_deref(), Some(team_b.id.as_str()));

        let buyer = f.teams.get_team(&team_b.id).await.unwrap().unwrap();
        assert_eq!(buyer.remaining_budget, 30000 - 3200);

        // No players left in either pool
        assert_eq!(state.status, AuctionStatus::Completed);
        assert!(state.current_player_id.is_none());
    }

    #[tokio::test]
    async fn start_requires_not_started_status() {
        let f = fixture();
        seed_player(&f.players, "One", Tier::Superstar).await;
        seed_player(&f.players, "Two", Tier::Superstar).await;

        f.service.start(Tier::Superstar).await.unwrap();
        let result = f.service.start(Tier::Superstar).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn start_with_empty_tier_reports_no_eligible_players() {
        let f = fixture();
        // Registered but never approved/verified
        let mut player = Player::new(
            "Unverified".to_string(),
            "5550009999".to_string(),
            PlayerRole::Batsman,
            9,
            9,
            9,
        );
        player.tier = Some(Tier::Superstar);
        f.players.create_player(&player).await.unwrap();

        let result = f.service.start(Tier::Superstar).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn players_are_selected_in_registration_order() {
        let f = fixture();
        let first = seed_player(&f.players, "First", Tier::Performer).await;
        let second = seed_player(&f.players, "Second", Tier::Performer).await;
        let team = seed_team(&f.teams, "Alpha", 30000).await;

        let state = f.service.start(Tier::Performer).await.unwrap();
        assert_eq!(state.current_player_id.as_deref(), Some(first.id.as_str()));

        f.service.place_bid(&team.id).await.unwrap();
        let state = f.service.sell().await.unwrap();
        assert_eq!(state.current_player_id.as_deref(), Some(second.id.as_str()));
        assert_eq!(state.current_bid, Some(2500));
        assert!(state.bid_history.is_empty());
    }

    #[tokio::test]
    async fn unsold_players_get_a_lost_gold_pass_then_terminal_unsold() {
        let f = fixture();
        let player = seed_player(&f.players, "Lone", Tier::Gem).await;
        seed_team(&f.teams, "Alpha", 30000).await;

        f.service.start(Tier::Gem).await.unwrap();

        // First pass: no bids, player drops into the lost-gold pool and is
        // immediately re-auctioned in the lost-gold round.
        let state = f.service.mark_unsold().await.unwrap();
        assert_eq!(state.status, AuctionStatus::LostGoldRound);
        assert_eq!(state.current_player_id.as_deref(), Some(player.id.as_str()));
        assert_eq!(state.current_bid, Some(1500));

        // Second pass: still no takers, now terminal.
        let state = f.service.mark_unsold().await.unwrap();
        assert_eq!(state.status, AuctionStatus::Completed);

        let stored = f.players.get_player(&player.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PlayerStatus::Unsold);
    }

    #[tokio::test]
    async fn lost_gold_round_opens_at_the_players_own_tier_price() {
        let f = fixture();
        let star = seed_player(&f.players, "Star", Tier::Superstar).await;
        let gem = seed_player(&f.players, "Gem", Tier::Gem).await;
        let team = seed_team(&f.teams, "Alpha", 30000).await;

        f.service.start(Tier::Superstar).await.unwrap();
        f.service.mark_unsold().await.unwrap(); // star -> lost gold

        // Primary superstar pool is now empty, so the lost-gold round starts
        // with the star at the superstar base price.
        let state = f.service.get_state().await.unwrap();
        assert_eq!(state.status, AuctionStatus::LostGoldRound);
        assert_eq!(state.current_player_id.as_deref(), Some(star.id.as_str()));
        assert_eq!(state.current_bid, Some(3000));

        f.service.place_bid(&team.id).await.unwrap();
        let state = f.service.sell().await.unwrap();

        // Gem tier was never opened; its players stay out of the cascade.
        assert_eq!(state.status, AuctionStatus::Completed);
        let gem_stored = f.players.get_player(&gem.id).await.unwrap().unwrap();
        assert_eq!(gem_stored.status, PlayerStatus::Registered);
    }

    #[tokio::test]
    async fn sell_without_bids_is_a_conflict() {
        let f = fixture();
        seed_player(&f.players, "Solo", Tier::Gem).await;
        f.service.start(Tier::Gem).await.unwrap();

        let result = f.service.sell().await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn pause_and_resume_gate_bidding() {
        let f = fixture();
        seed_player(&f.players, "Solo", Tier::Gem).await;
        let team = seed_team(&f.teams, "Alpha", 30000).await;

        f.service.start(Tier::Gem).await.unwrap();
        f.service.pause().await.unwrap();

        let result = f.service.place_bid(&team.id).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

        f.service.resume().await.unwrap();
        let state = f.service.place_bid(&team.id).await.unwrap();
        assert_eq!(state.current_bid, Some(1600));

        // Resume only applies to a paused auction
        let result = f.service.resume().await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn stop_returns_live_player_to_the_pool() {
        let f = fixture();
        let player = seed_player(&f.players, "Solo", Tier::Gem).await;

        f.service.start(Tier::Gem).await.unwrap();
        let state = f.service.stop().await.unwrap();

        assert_eq!(state.status, AuctionStatus::Completed);
        let stored = f.players.get_player(&player.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PlayerStatus::Registered);
    }

    #[tokio::test]
    async fn reset_restores_budgets_and_statuses() {
        let f = fixture();
        let player = seed_player(&f.players, "Solo", Tier::Superstar).await;
        let team = seed_team(&f.teams, "Alpha", 30000).await;

        f.service.start(Tier::Superstar).await.unwrap();
        f.service.place_bid(&team.id).await.unwrap();
        f.service.sell().await.unwrap();

        let state = f.service.reset().await.unwrap();
        assert_eq!(state.status, AuctionStatus::NotStarted);
        assert!(state.current_player_id.is_none());
        assert!(state.bid_history.is_empty());

        let stored = f.players.get_player(&player.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PlayerStatus::Registered);
        assert!(stored.team_id.is_none());
        assert!(stored.sold_price.is_none());
        assert!(!stored.is_locked);
        // Approval, payment and tier survive a reset
        assert!(stored.is_auction_eligible());
        assert_eq!(stored.tier, Some(Tier::Superstar));

        let stored_team = f.teams.get_team(&team.id).await.unwrap().unwrap();
        assert_eq!(stored_team.remaining_budget, stored_team.budget);
    }

    #[tokio::test]
    async fn select_tier_is_rejected_mid_lot() {
        let f = fixture();
        seed_player(&f.players, "Solo", Tier::Gem).await;
        f.service.start(Tier::Gem).await.unwrap();

        let result = f.service.select_tier(Tier::Superstar).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn next_moves_on_and_returns_the_skipped_player_to_the_pool() {
        let f = fixture();
        let skipped = seed_player(&f.players, "Skipped", Tier::Gem).await;
        let second = seed_player(&f.players, "Second", Tier::Gem).await;

        f.service.start(Tier::Gem).await.unwrap();
        let state = f.service.next(None).await.unwrap();

        // The skipped player went back to the registered pool, so insertion
        // order puts them up again before the second player.
        assert_eq!(state.current_player_id.as_deref(), Some(skipped.id.as_str()));
        let second_stored = f.players.get_player(&second.id).await.unwrap().unwrap();
        assert_eq!(second_stored.status, PlayerStatus::Registered);
    }

    #[tokio::test]
    async fn concurrent_bids_are_serialized() {
        let f = fixture();
        seed_player(&f.players, "Solo", Tier::Superstar).await;
        let mut team_ids = Vec::new();
        for name in ["Alpha", "Bravo", "Chargers", "Dynamos"] {
            team_ids.push(seed_team(&f.teams, name, 30000).await.id);
        }

        f.service.start(Tier::Superstar).await.unwrap();

        let handles = team_ids
            .iter()
            .map(|team_id| {
                let service = Arc::clone(&f.service);
                let team_id = team_id.clone();
                tokio::spawn(async move { service.place_bid(&team_id).await })
            })
            .collect::<Vec<_>>();

        let results = futures::future::join_all(handles).await;
        let successes = results.into_iter().filter(|r| r.as_ref().unwrap().is_ok()).count();
        assert_eq!(successes, 4);

        let state = f.service.get_state().await.unwrap();
        assert_eq!(state.current_bid, Some(3400));
        let amounts: Vec<u32> = state.bid_history.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![3100, 3200, 3300, 3400]);
    }
}

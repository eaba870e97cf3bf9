use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::state::AuctionState;
use crate::shared::AppError;

/// Storage for the auction singleton. There is exactly one auction state per
/// tournament; `load` returns a fresh not-started state when none has been
/// persisted yet.
#[async_trait]
pub trait AuctionStateRepository: Send + Sync {
    async fn load(&self) -> Result<AuctionState, AppError>;
    async fn save(&self, state: &AuctionState) -> Result<(), AppError>;
}

/// In-memory implementation of AuctionStateRepository for development and testing
pub struct InMemoryAuctionStateRepository {
    state: Mutex<AuctionState>,
}

impl Default for InMemoryAuctionStateRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuctionStateRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AuctionState::new()),
        }
    }
}

#[async_trait]
impl AuctionStateRepository for InMemoryAuctionStateRepository {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<AuctionState, AppError> {
        Ok(self.state.lock().unwrap().clone())
    }

    #[instrument(skip(self, state))]
    async fn save(&self, state: &AuctionState) -> Result<(), AppError> {
        *self.state.lock().unwrap() = state.clone();
        Ok(())
    }
}

/// PostgreSQL implementation of the auction state store.
///
/// The whole state is one row (`id = 1`) holding a JSON snapshot, matching
/// the singleton semantics of the engine.
pub struct PostgresAuctionStateRepository {
    pool: PgPool,
}

impl PostgresAuctionStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuctionStateRepository for PostgresAuctionStateRepository {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<AuctionState, AppError> {
        debug!("Fetching auction state from database");

        let row = sqlx::query("SELECT snapshot FROM auction_state WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch auction state from database");
                AppError::DatabaseError(e.to_string())
            })?;

        match row {
            Some(row) => {
                let snapshot: String = row.get("snapshot");
                serde_json::from_str(&snapshot).map_err(|e| {
                    warn!(error = %e, "Failed to decode auction state snapshot");
                    AppError::DatabaseError(e.to_string())
                })
            }
            None => {
                debug!("No auction state persisted yet, starting fresh");
                Ok(AuctionState::new())
            }
        }
    }

    #[instrument(skip(self, state))]
    async fn save(&self, state: &AuctionState) -> Result<(), AppError> {
        debug!("Saving auction state to database");

        let snapshot = serde_json::to_string(state).map_err(|e| {
            warn!(error = %e, "Failed to encode auction state snapshot");
            AppError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            "INSERT INTO auction_state (id, snapshot) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET snapshot = EXCLUDED.snapshot",
        )
        .bind(&snapshot)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to save auction state to database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}

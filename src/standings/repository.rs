use async_trait::async_trait;
use std::sync::Mutex;
use tracing::instrument;

use super::models::PointsRow;
use crate::shared::AppError;

#[async_trait]
pub trait PointsRepository: Send + Sync {
    async fn get_row(&self, team_id: &str) -> Result<Option<PointsRow>, AppError>;
    async fn upsert_row(&self, row: &PointsRow) -> Result<(), AppError>;
    async fn list_rows(&self) -> Result<Vec<PointsRow>, AppError>;
}

/// In-memory implementation of PointsRepository for development and testing
pub struct InMemoryPointsRepository {
    rows: Mutex<Vec<PointsRow>>,
}

impl Default for InMemoryPointsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPointsRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PointsRepository for InMemoryPointsRepository {
    #[instrument(skip(self))]
    async fn get_row(&self, team_id: &str) -> Result<Option<PointsRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.team_id == team_id).cloned())
    }

    #[instrument(skip(self, row))]
    async fn upsert_row(&self, row: &PointsRow) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.team_id == row.team_id) {
            Some(slot) => *slot = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_rows(&self) -> Result<Vec<PointsRow>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.clone())
    }
}

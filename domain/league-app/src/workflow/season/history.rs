use std::sync::Arc;

use thiserror::Error;

use crate::domain::season::{Season, SeasonRepository};

#[derive(Clone, Debug)]
pub struct SeasonHistoryView {
    /// Newest first.
    pub seasons: Vec<Season>,
    pub active: Option<Season>,
}

#[async_trait::async_trait]
pub trait SeasonHistoryUseCase {
    async fn season_history(&self) -> Result<SeasonHistoryView, SeasonHistoryError>;
}

#[derive(Debug, Error)]
pub enum SeasonHistoryError {
    #[error("the season history could not be loaded")]
    Internal,
}

pub struct SeasonHistoryUseCaseImpl<S: SeasonRepository> {
    season_repo: Arc<S>,
}

impl<S: SeasonRepository> SeasonHistoryUseCaseImpl<S> {
    pub fn new(season_repo: Arc<S>) -> Self {
        Self { season_repo }
    }
}

#[async_trait::async_trait]
impl<S: SeasonRepository + Send + Sync + 'static> SeasonHistoryUseCase
    for SeasonHistoryUseCaseImpl<S>
{
    async fn season_history(&self) -> Result<SeasonHistoryView, SeasonHistoryError> {
        let seasons = self.season_repo.list_seasons().await.map_err(|e| {
            log::error!("Failed to list seasons: {}", e);
            SeasonHistoryError::Internal
        })?;
        let active = seasons.iter().find(|s| s.is_active).cloned();
        Ok(SeasonHistoryView { seasons, active })
    }
}

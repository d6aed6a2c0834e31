use std::sync::Arc;

use thiserror::Error;

use crate::domain::season::{Season, SeasonRepository};

#[async_trait::async_trait]
pub trait GetActiveSeasonUseCase {
    async fn get_active_season(&self) -> Result<Season, GetActiveSeasonError>;
}

#[derive(Debug, Error)]
pub enum GetActiveSeasonError {
    #[error("no active season")]
    NoActiveSeason,
    #[error("the active season could not be loaded")]
    Internal,
}

pub struct GetActiveSeasonUseCaseImpl<S: SeasonRepository> {
    season_repo: Arc<S>,
}

impl<S: SeasonRepository> GetActiveSeasonUseCaseImpl<S> {
    pub fn new(season_repo: Arc<S>) -> Self {
        Self { season_repo }
    }
}

#[async_trait::async_trait]
impl<S: SeasonRepository + Send + Sync + 'static> GetActiveSeasonUseCase
    for GetActiveSeasonUseCaseImpl<S>
{
    async fn get_active_season(&self) -> Result<Season, GetActiveSeasonError> {
        match self.season_repo.get_active_season().await {
            Ok(Some(season)) => Ok(season),
            Ok(None) => Err(GetActiveSeasonError::NoActiveSeason),
            Err(e) => {
                log::error!("Failed to load active season: {}", e);
                Err(GetActiveSeasonError::Internal)
            }
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::domain::season::{Season, SeasonRepository, rollover_season_name};

/// Finishes the active season, if any, and starts a fresh one at week 1.
/// Players and their active flags carry over.
#[async_trait::async_trait]
pub trait StartNewSeasonUseCase {
    async fn start_new_season(&self) -> Result<Season, StartNewSeasonError>;
}

#[derive(Debug, Error)]
pub enum StartNewSeasonError {
    #[error("the new season could not be started")]
    Internal,
}

pub struct StartNewSeasonUseCaseImpl<S: SeasonRepository> {
    season_repo: Arc<S>,
    league_name: String,
}

impl<S: SeasonRepository> StartNewSeasonUseCaseImpl<S> {
    pub fn new(season_repo: Arc<S>, league_name: String) -> Self {
        Self {
            season_repo,
            league_name,
        }
    }
}

#[async_trait::async_trait]
impl<S: SeasonRepository + Send + Sync + 'static> StartNewSeasonUseCase
    for StartNewSeasonUseCaseImpl<S>
{
    async fn start_new_season(&self) -> Result<Season, StartNewSeasonError> {
        let now = Utc::now();
        let name = rollover_season_name(&self.league_name, now);
        let season = self.season_repo.roll_over(&name, now).await.map_err(|e| {
            log::error!("Failed to roll over to season {}: {}", name, e);
            StartNewSeasonError::Internal
        })?;
        log::info!("Started season {} ({})", season.name, season.id);
        Ok(season)
    }
}

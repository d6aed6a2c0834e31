use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::domain::{
    RepoCreateError,
    player::{DEFAULT_ROSTER, LEGACY_ROSTER, PlayerRepository},
    season::{Season, SeasonRepository, opening_season_name},
};

/// Returns the active season, opening one named after the league when there
/// is none. Opening a season also replaces placeholder players with the
/// default roster.
#[async_trait::async_trait]
pub trait EnsureSeasonUseCase {
    async fn ensure_season(&self) -> Result<Season, EnsureSeasonError>;
}

#[derive(Debug, Error)]
pub enum EnsureSeasonError {
    #[error("the season could not be opened")]
    Internal,
}

pub struct EnsureSeasonUseCaseImpl<S: SeasonRepository, P: PlayerRepository> {
    season_repo: Arc<S>,
    player_repo: Arc<P>,
    league_name: String,
}

impl<S: SeasonRepository, P: PlayerRepository> EnsureSeasonUseCaseImpl<S, P> {
    pub fn new(season_repo: Arc<S>, player_repo: Arc<P>, league_name: String) -> Self {
        Self {
            season_repo,
            player_repo,
            league_name,
        }
    }
}

#[async_trait::async_trait]
impl<S, P> EnsureSeasonUseCase for EnsureSeasonUseCaseImpl<S, P>
where
    S: SeasonRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
{
    async fn ensure_season(&self) -> Result<Season, EnsureSeasonError> {
        match self.season_repo.get_active_season().await {
            Ok(Some(season)) => return Ok(season),
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to load active season: {}", e);
                return Err(EnsureSeasonError::Internal);
            }
        }

        self.player_repo
            .seed_roster(&LEGACY_ROSTER, &DEFAULT_ROSTER)
            .await
            .map_err(|e| {
                log::error!("Failed to seed default roster: {}", e);
                EnsureSeasonError::Internal
            })?;

        let now = Utc::now();
        let name = opening_season_name(&self.league_name, now);
        match self.season_repo.create_season(&name, now).await {
            Ok(season) => {
                log::info!("Opened season {} ({})", season.name, season.id);
                Ok(season)
            }
            // A concurrent request opened a season first.
            Err(RepoCreateError::Conflict) => match self.season_repo.get_active_season().await {
                Ok(Some(season)) => Ok(season),
                Ok(None) => {
                    log::error!("Season {} conflicts but no season is active", name);
                    Err(EnsureSeasonError::Internal)
                }
                Err(e) => {
                    log::error!("Failed to reload active season: {}", e);
                    Err(EnsureSeasonError::Internal)
                }
            },
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Failed to create season {}: {}", name, e);
                Err(EnsureSeasonError::Internal)
            }
        }
    }
}

use std::sync::Arc;

use thiserror::Error;

use crate::domain::player::{DEFAULT_ROSTER, PlayerRepository, legacy_renames};

/// Replaces legacy placeholder names with the default roster names.
#[async_trait::async_trait]
pub trait MigratePlayerNamesUseCase {
    /// Returns the number of players renamed or created.
    async fn migrate_player_names(&self) -> Result<usize, MigratePlayerNamesError>;
}

#[derive(Debug, Error)]
pub enum MigratePlayerNamesError {
    #[error("player names could not be updated: {0}")]
    Failed(String),
}

pub struct MigratePlayerNamesUseCaseImpl<P: PlayerRepository> {
    player_repo: Arc<P>,
}

impl<P: PlayerRepository> MigratePlayerNamesUseCaseImpl<P> {
    pub fn new(player_repo: Arc<P>) -> Self {
        Self { player_repo }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> MigratePlayerNamesUseCase
    for MigratePlayerNamesUseCaseImpl<P>
{
    async fn migrate_player_names(&self) -> Result<usize, MigratePlayerNamesError> {
        let changed = self
            .player_repo
            .migrate_roster_names(&legacy_renames(), &DEFAULT_ROSTER)
            .await
            .map_err(|e| {
                log::error!("Roster name migration rolled back: {}", e);
                MigratePlayerNamesError::Failed(e.to_string())
            })?;
        log::info!("Roster name migration changed {} players", changed);
        Ok(changed)
    }
}

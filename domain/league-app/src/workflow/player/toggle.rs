use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    PlayerId, ROSTER_SIZE, RepoRetrieveError, RepoUpdateError,
    player::{Player, PlayerRepository},
};

#[async_trait::async_trait]
pub trait TogglePlayerUseCase {
    /// Flips the player's active flag and returns the updated player.
    async fn toggle_player(&self, id: PlayerId) -> Result<Player, TogglePlayerError>;
}

#[derive(Debug, Error)]
pub enum TogglePlayerError {
    #[error("player not found")]
    NotFound,
    #[error("at most {} active players are allowed", ROSTER_SIZE)]
    RosterFull,
    #[error("the player could not be updated")]
    Internal,
}

pub struct TogglePlayerUseCaseImpl<P: PlayerRepository> {
    player_repo: Arc<P>,
}

impl<P: PlayerRepository> TogglePlayerUseCaseImpl<P> {
    pub fn new(player_repo: Arc<P>) -> Self {
        Self { player_repo }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> TogglePlayerUseCase
    for TogglePlayerUseCaseImpl<P>
{
    async fn toggle_player(&self, id: PlayerId) -> Result<Player, TogglePlayerError> {
        let mut player = match self.player_repo.get_player(id).await {
            Ok(player) => player,
            Err(RepoRetrieveError::NotFound) => return Err(TogglePlayerError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load player {}: {}", id, e);
                return Err(TogglePlayerError::Internal);
            }
        };

        if !player.is_active {
            let active = self.player_repo.count_active_players().await.map_err(|e| {
                log::error!("Failed to count active players: {}", e);
                TogglePlayerError::Internal
            })?;
            if active >= ROSTER_SIZE {
                return Err(TogglePlayerError::RosterFull);
            }
        }

        let is_active = !player.is_active;
        match self.player_repo.set_active(id, is_active).await {
            Ok(()) => {}
            Err(RepoUpdateError::NotFound) => return Err(TogglePlayerError::NotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to toggle player {}: {}", id, e);
                return Err(TogglePlayerError::Internal);
            }
        }
        player.is_active = is_active;
        log::info!(
            "Player {} ({}) is now {}",
            player.name,
            id,
            if is_active { "active" } else { "inactive" }
        );
        Ok(player)
    }
}

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    ROSTER_SIZE, RepoCreateError, RepoUpdateError,
    player::{Player, PlayerRepository},
};

#[async_trait::async_trait]
pub trait AddPlayerUseCase {
    /// Creates a new active player, or reactivates a benched one with the
    /// same name. The name is trimmed first.
    async fn add_player(&self, name: &str) -> Result<AddPlayerOutcome, AddPlayerError>;
}

#[derive(Clone, Debug)]
pub enum AddPlayerOutcome {
    Created(Player),
    Reactivated(Player),
}

impl AddPlayerOutcome {
    pub fn player(&self) -> &Player {
        match self {
            AddPlayerOutcome::Created(p) | AddPlayerOutcome::Reactivated(p) => p,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddPlayerError {
    #[error("player name is required")]
    NameRequired,
    #[error("{0} is already active")]
    AlreadyActive(String),
    #[error("at most {} active players are allowed", ROSTER_SIZE)]
    RosterFull,
    #[error("the player could not be saved")]
    Internal,
}

pub struct AddPlayerUseCaseImpl<P: PlayerRepository> {
    player_repo: Arc<P>,
}

impl<P: PlayerRepository> AddPlayerUseCaseImpl<P> {
    pub fn new(player_repo: Arc<P>) -> Self {
        Self { player_repo }
    }
}

impl<P: PlayerRepository + Send + Sync + 'static> AddPlayerUseCaseImpl<P> {
    async fn ensure_room(&self) -> Result<(), AddPlayerError> {
        let active = self.player_repo.count_active_players().await.map_err(|e| {
            log::error!("Failed to count active players: {}", e);
            AddPlayerError::Internal
        })?;
        if active >= ROSTER_SIZE {
            return Err(AddPlayerError::RosterFull);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> AddPlayerUseCase for AddPlayerUseCaseImpl<P> {
    async fn add_player(&self, name: &str) -> Result<AddPlayerOutcome, AddPlayerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AddPlayerError::NameRequired);
        }

        let existing = self
            .player_repo
            .find_player_by_name(name)
            .await
            .map_err(|e| {
                log::error!("Failed to look up player {}: {}", name, e);
                AddPlayerError::Internal
            })?;

        match existing {
            Some(player) if player.is_active => Err(AddPlayerError::AlreadyActive(player.name)),
            Some(mut player) => {
                self.ensure_room().await?;
                match self.player_repo.set_active(player.id, true).await {
                    Ok(()) => {}
                    Err(RepoUpdateError::NotFound) => {
                        log::error!("Player {} vanished during reactivation", player.id);
                        return Err(AddPlayerError::Internal);
                    }
                    Err(RepoUpdateError::StorageError(e)) => {
                        log::error!("Failed to reactivate player {}: {}", player.id, e);
                        return Err(AddPlayerError::Internal);
                    }
                }
                player.is_active = true;
                log::info!("Reactivated player {} ({})", player.name, player.id);
                Ok(AddPlayerOutcome::Reactivated(player))
            }
            None => {
                self.ensure_room().await?;
                match self.player_repo.create_player(name, true).await {
                    Ok(player) => {
                        log::info!("Created player {} ({})", player.name, player.id);
                        Ok(AddPlayerOutcome::Created(player))
                    }
                    Err(RepoCreateError::Conflict) => {
                        Err(AddPlayerError::AlreadyActive(name.to_string()))
                    }
                    Err(RepoCreateError::StorageError(e)) => {
                        log::error!("Failed to create player {}: {}", name, e);
                        Err(AddPlayerError::Internal)
                    }
                }
            }
        }
    }
}

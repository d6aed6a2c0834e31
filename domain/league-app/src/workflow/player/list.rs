use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::player::{PlayerFilter, PlayerRepository},
    workflow::player::RosterView,
};

#[async_trait::async_trait]
pub trait ListPlayersUseCase {
    async fn list_players(&self) -> Result<RosterView, ListPlayersError>;
}

#[derive(Debug, Error)]
pub enum ListPlayersError {
    #[error("players could not be loaded")]
    Internal,
}

pub struct ListPlayersUseCaseImpl<P: PlayerRepository> {
    player_repo: Arc<P>,
}

impl<P: PlayerRepository> ListPlayersUseCaseImpl<P> {
    pub fn new(player_repo: Arc<P>) -> Self {
        Self { player_repo }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> ListPlayersUseCase
    for ListPlayersUseCaseImpl<P>
{
    async fn list_players(&self) -> Result<RosterView, ListPlayersError> {
        let players = self
            .player_repo
            .list_players(PlayerFilter::default())
            .await
            .map_err(|e| {
                log::error!("Failed to list players: {}", e);
                ListPlayersError::Internal
            })?;
        let (active, inactive): (Vec<_>, Vec<_>) = players.into_iter().partition(|p| p.is_active);
        Ok(RosterView { active, inactive })
    }
}

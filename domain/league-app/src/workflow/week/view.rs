use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        SeasonId,
        r#match::MatchRepository,
        player::{PlayerFilter, PlayerRepository},
        standings::StandingsScope,
    },
    workflow::{
        standings::load_standings,
        week::{MatchView, WeekView},
    },
};

#[async_trait::async_trait]
pub trait GetWeekUseCase {
    /// The week's matches in match order together with that week's standings.
    async fn get_week(&self, season_id: SeasonId, week_number: u32)
    -> Result<WeekView, GetWeekError>;
}

#[derive(Debug, Error)]
pub enum GetWeekError {
    #[error("the week could not be loaded")]
    Internal,
}

pub struct GetWeekUseCaseImpl<P: PlayerRepository, M: MatchRepository> {
    player_repo: Arc<P>,
    match_repo: Arc<M>,
}

impl<P: PlayerRepository, M: MatchRepository> GetWeekUseCaseImpl<P, M> {
    pub fn new(player_repo: Arc<P>, match_repo: Arc<M>) -> Self {
        Self {
            player_repo,
            match_repo,
        }
    }
}

#[async_trait::async_trait]
impl<P, M> GetWeekUseCase for GetWeekUseCaseImpl<P, M>
where
    P: PlayerRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
{
    async fn get_week(
        &self,
        season_id: SeasonId,
        week_number: u32,
    ) -> Result<WeekView, GetWeekError> {
        let matches = self
            .match_repo
            .list_week_matches(season_id, week_number)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to list week {} matches of season {}: {}",
                    week_number,
                    season_id,
                    e
                );
                GetWeekError::Internal
            })?;

        // Benched players still appear by name in matches they played.
        let players = self
            .player_repo
            .list_players(PlayerFilter::default())
            .await
            .map_err(|e| {
                log::error!("Failed to list players: {}", e);
                GetWeekError::Internal
            })?;

        let standings = load_standings(
            self.player_repo.as_ref(),
            self.match_repo.as_ref(),
            season_id,
            StandingsScope::Week(week_number),
        )
        .await
        .map_err(|e| {
            log::error!("Failed to compute week {} standings: {}", week_number, e);
            GetWeekError::Internal
        })?;

        Ok(WeekView {
            week_number,
            matches: matches.iter().map(|m| MatchView::from(m, &players)).collect(),
            standings,
        })
    }
}

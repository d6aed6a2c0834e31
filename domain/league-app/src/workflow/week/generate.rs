use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        MATCHES_PER_PLAYER, ROSTER_SIZE, RepoCreateError, RepoRetrieveError, SeasonId,
        fixture::{FixtureError, PairingStrategy},
        r#match::{Match, MatchRepository},
        player::{PlayerFilter, PlayerRepository},
        season::SeasonRepository,
    },
};

#[async_trait::async_trait]
pub trait GenerateWeekUseCase {
    /// Schedules the season's current week.
    async fn generate_week(&self, season_id: SeasonId) -> Result<GeneratedWeek, GenerateWeekError>;
}

#[derive(Clone, Debug)]
pub struct GeneratedWeek {
    pub week_number: u32,
    pub matches: Vec<Match>,
}

#[derive(Debug, Error)]
pub enum GenerateWeekError {
    #[error("season not found")]
    SeasonNotFound,
    #[error("exactly 5 active players are required (currently {found})")]
    WrongRosterSize { found: usize },
    #[error("week {0} has already been generated")]
    AlreadyScheduled(u32),
    #[error("the week could not be generated")]
    Internal,
}

pub struct GenerateWeekUseCaseImpl<S: SeasonRepository, P: PlayerRepository, M: MatchRepository> {
    season_repo: Arc<S>,
    player_repo: Arc<P>,
    match_repo: Arc<M>,
    pairing: Arc<dyn PairingStrategy + Send + Sync + 'static>,
}

impl<S: SeasonRepository, P: PlayerRepository, M: MatchRepository> GenerateWeekUseCaseImpl<S, P, M> {
    pub fn new(
        season_repo: Arc<S>,
        player_repo: Arc<P>,
        match_repo: Arc<M>,
        pairing: Arc<dyn PairingStrategy + Send + Sync + 'static>,
    ) -> Self {
        Self {
            season_repo,
            player_repo,
            match_repo,
            pairing,
        }
    }
}

#[async_trait::async_trait]
impl<S, P, M> GenerateWeekUseCase for GenerateWeekUseCaseImpl<S, P, M>
where
    S: SeasonRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
{
    async fn generate_week(&self, season_id: SeasonId) -> Result<GeneratedWeek, GenerateWeekError> {
        let season = match self.season_repo.get_season(season_id).await {
            Ok(season) => season,
            Err(RepoRetrieveError::NotFound) => return Err(GenerateWeekError::SeasonNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load season {}: {}", season_id, e);
                return Err(GenerateWeekError::Internal);
            }
        };
        let week_number = season.current_week;

        let players = self
            .player_repo
            .list_players(PlayerFilter::active())
            .await
            .map_err(|e| {
                log::error!("Failed to list active players: {}", e);
                GenerateWeekError::Internal
            })?;

        if players.len() != ROSTER_SIZE {
            return Err(GenerateWeekError::WrongRosterSize {
                found: players.len(),
            });
        }

        match self.match_repo.has_week_matches(season_id, week_number).await {
            Ok(false) => {}
            Ok(true) => return Err(GenerateWeekError::AlreadyScheduled(week_number)),
            Err(e) => {
                log::error!("Failed to check week {} matches: {}", week_number, e);
                return Err(GenerateWeekError::Internal);
            }
        }

        let player_ids: Vec<_> = players.iter().map(|p| p.id).collect();
        let fixtures = self.pairing.pair(&player_ids).map_err(|e| match e {
            FixtureError::WrongRosterSize { found } => GenerateWeekError::WrongRosterSize { found },
            FixtureError::DuplicatePlayer(id) => {
                log::error!("Active roster lists player {} twice", id);
                GenerateWeekError::Internal
            }
        })?;

        let matches = match self
            .match_repo
            .create_week_matches(season_id, week_number, &fixtures)
            .await
        {
            Ok(matches) => matches,
            Err(RepoCreateError::Conflict) => {
                return Err(GenerateWeekError::AlreadyScheduled(week_number));
            }
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Failed to store week {} fixtures: {}", week_number, e);
                return Err(GenerateWeekError::Internal);
            }
        };

        log::info!(
            "Generated week {} of season {}: {} matches, {} per player",
            week_number,
            season_id,
            matches.len(),
            MATCHES_PER_PLAYER
        );
        Ok(GeneratedWeek {
            week_number,
            matches,
        })
    }
}

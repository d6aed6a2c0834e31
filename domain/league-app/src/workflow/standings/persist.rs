use std::sync::Arc;

use crate::{
    domain::{
        RepoError, SeasonId,
        r#match::MatchRepository,
        player::PlayerRepository,
        standings::{StandingsRepository, StandingsScope},
    },
    workflow::standings::load_standings,
};

/// Refreshes the cached weekly rows of one week.
#[async_trait::async_trait]
pub trait PersistWeeklyStandingsWorkflow {
    async fn persist_week(&self, season_id: SeasonId, week_number: u32) -> Result<(), RepoError>;
}

pub struct PersistWeeklyStandingsWorkflowImpl<
    P: PlayerRepository,
    M: MatchRepository,
    S: StandingsRepository,
> {
    player_repo: Arc<P>,
    match_repo: Arc<M>,
    standings_repo: Arc<S>,
}

impl<P: PlayerRepository, M: MatchRepository, S: StandingsRepository>
    PersistWeeklyStandingsWorkflowImpl<P, M, S>
{
    pub fn new(player_repo: Arc<P>, match_repo: Arc<M>, standings_repo: Arc<S>) -> Self {
        Self {
            player_repo,
            match_repo,
            standings_repo,
        }
    }
}

#[async_trait::async_trait]
impl<P, M, S> PersistWeeklyStandingsWorkflow for PersistWeeklyStandingsWorkflowImpl<P, M, S>
where
    P: PlayerRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    S: StandingsRepository + Send + Sync + 'static,
{
    async fn persist_week(&self, season_id: SeasonId, week_number: u32) -> Result<(), RepoError> {
        let rows = load_standings(
            self.player_repo.as_ref(),
            self.match_repo.as_ref(),
            season_id,
            StandingsScope::Week(week_number),
        )
        .await?;
        self.standings_repo
            .upsert_weekly_standings(season_id, week_number, &rows)
            .await?;
        log::debug!(
            "Cached {} standing rows for season {} week {}",
            rows.len(),
            season_id,
            week_number
        );
        Ok(())
    }
}

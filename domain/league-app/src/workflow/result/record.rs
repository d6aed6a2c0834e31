use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        MatchId, RepoRetrieveError, RepoUpdateError,
        r#match::{Match, MatchRepository, winner_of},
    },
    workflow::standings::persist::PersistWeeklyStandingsWorkflow,
};

/// Stores a final score. Score ranges are not validated: negative or absurd
/// values are stored as given.
#[async_trait::async_trait]
pub trait RecordResultUseCase {
    async fn record_result(
        &self,
        match_id: MatchId,
        player1_score: i64,
        player2_score: i64,
    ) -> Result<Match, RecordResultError>;
}

#[derive(Debug, Error)]
pub enum RecordResultError {
    #[error("match not found")]
    MatchNotFound,
    #[error("the result could not be saved")]
    Internal,
}

pub struct RecordResultUseCaseImpl<M: MatchRepository, W: PersistWeeklyStandingsWorkflow> {
    match_repo: Arc<M>,
    persist_standings_workflow: Arc<W>,
}

impl<M: MatchRepository, W: PersistWeeklyStandingsWorkflow> RecordResultUseCaseImpl<M, W> {
    pub fn new(match_repo: Arc<M>, persist_standings_workflow: Arc<W>) -> Self {
        Self {
            match_repo,
            persist_standings_workflow,
        }
    }
}

#[async_trait::async_trait]
impl<M, W> RecordResultUseCase for RecordResultUseCaseImpl<M, W>
where
    M: MatchRepository + Send + Sync + 'static,
    W: PersistWeeklyStandingsWorkflow + Send + Sync + 'static,
{
    async fn record_result(
        &self,
        match_id: MatchId,
        player1_score: i64,
        player2_score: i64,
    ) -> Result<Match, RecordResultError> {
        let existing = match self.match_repo.get_match(match_id).await {
            Ok(m) => m,
            Err(RepoRetrieveError::NotFound) => return Err(RecordResultError::MatchNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load match {}: {}", match_id, e);
                return Err(RecordResultError::Internal);
            }
        };

        let winner = winner_of(
            existing.player1_id,
            existing.player2_id,
            player1_score,
            player2_score,
        );
        let updated = match self
            .match_repo
            .record_result(match_id, player1_score, player2_score, winner)
            .await
        {
            Ok(m) => m,
            Err(RepoUpdateError::NotFound) => return Err(RecordResultError::MatchNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to record result for match {}: {}", match_id, e);
                return Err(RecordResultError::Internal);
            }
        };
        log::info!(
            "Match {} (season {} week {}) recorded {}-{}",
            match_id,
            updated.season_id,
            updated.week_number,
            player1_score,
            player2_score
        );

        // The score is already stored; a stale cache is recomputable.
        if let Err(e) = self
            .persist_standings_workflow
            .persist_week(updated.season_id, updated.week_number)
            .await
        {
            log::warn!(
                "Failed to refresh standings cache for season {} week {}: {}",
                updated.season_id,
                updated.week_number,
                e
            );
        }

        Ok(updated)
    }
}

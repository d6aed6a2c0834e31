use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    RepoRetrieveError, RepoUpdateError, SeasonId, r#match::MatchRepository,
    season::SeasonRepository,
};

#[async_trait::async_trait]
pub trait AdvanceWeekUseCase {
    /// Moves the season to its next week and returns the new week number.
    async fn advance_week(&self, season_id: SeasonId) -> Result<u32, AdvanceWeekError>;
}

#[derive(Debug, Error)]
pub enum AdvanceWeekError {
    #[error("season not found")]
    SeasonNotFound,
    #[error("finish all matches of week {week} before moving on ({pending} still to play)")]
    IncompleteWeek { week: u32, pending: usize },
    #[error("the week could not be advanced")]
    Internal,
}

pub struct AdvanceWeekUseCaseImpl<S: SeasonRepository, M: MatchRepository> {
    season_repo: Arc<S>,
    match_repo: Arc<M>,
}

impl<S: SeasonRepository, M: MatchRepository> AdvanceWeekUseCaseImpl<S, M> {
    pub fn new(season_repo: Arc<S>, match_repo: Arc<M>) -> Self {
        Self {
            season_repo,
            match_repo,
        }
    }
}

#[async_trait::async_trait]
impl<S, M> AdvanceWeekUseCase for AdvanceWeekUseCaseImpl<S, M>
where
    S: SeasonRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
{
    async fn advance_week(&self, season_id: SeasonId) -> Result<u32, AdvanceWeekError> {
        let season = match self.season_repo.get_season(season_id).await {
            Ok(season) => season,
            Err(RepoRetrieveError::NotFound) => return Err(AdvanceWeekError::SeasonNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load season {}: {}", season_id, e);
                return Err(AdvanceWeekError::Internal);
            }
        };

        let matches = self
            .match_repo
            .list_week_matches(season_id, season.current_week)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to list week {} matches of season {}: {}",
                    season.current_week,
                    season_id,
                    e
                );
                AdvanceWeekError::Internal
            })?;

        // An unscheduled week has nothing pending and may be skipped.
        let pending = matches.iter().filter(|m| !m.is_completed).count();
        if pending > 0 {
            return Err(AdvanceWeekError::IncompleteWeek {
                week: season.current_week,
                pending,
            });
        }

        let week = match self.season_repo.advance_week(season_id).await {
            Ok(week) => week,
            Err(RepoUpdateError::NotFound) => return Err(AdvanceWeekError::SeasonNotFound),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to advance season {}: {}", season_id, e);
                return Err(AdvanceWeekError::Internal);
            }
        };
        log::info!("Season {} moved to week {}", season_id, week);
        Ok(week)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{fixture::Fixture, season::SeasonRepository},
        mock::MockLeagueStore,
    };

    use super::*;

    async fn schedule_two(store: &MockLeagueStore, season_id: SeasonId) -> Vec<crate::domain::r#match::Match> {
        let a = store.add_player("A", true);
        let b = store.add_player("B", true);
        store
            .create_week_matches(
                season_id,
                1,
                &[
                    Fixture {
                        match_number: 1,
                        player1: a.id,
                        player2: b.id,
                    },
                    Fixture {
                        match_number: 2,
                        player1: b.id,
                        player2: a.id,
                    },
                ],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_incomplete_week_is_rejected_and_counter_unchanged() {
        let store = Arc::new(MockLeagueStore::new());
        let season = store.add_season("Test");
        let matches = schedule_two(&store, season.id).await;
        store
            .record_result(matches[0].id, 1, 0, None)
            .await
            .unwrap();

        let use_case = AdvanceWeekUseCaseImpl::new(store.clone(), store.clone());
        assert!(matches!(
            use_case.advance_week(season.id).await,
            Err(AdvanceWeekError::IncompleteWeek { week: 1, pending: 1 })
        ));
        assert_eq!(store.get_season(season.id).await.unwrap().current_week, 1);
    }

    #[tokio::test]
    async fn test_completed_week_advances_by_one() {
        let store = Arc::new(MockLeagueStore::new());
        let season = store.add_season("Test");
        let matches = schedule_two(&store, season.id).await;
        for m in &matches {
            store.record_result(m.id, 2, 2, None).await.unwrap();
        }

        let use_case = AdvanceWeekUseCaseImpl::new(store.clone(), store.clone());
        assert_eq!(use_case.advance_week(season.id).await.unwrap(), 2);
        assert_eq!(store.get_season(season.id).await.unwrap().current_week, 2);
    }

    #[tokio::test]
    async fn test_unscheduled_week_can_be_skipped() {
        let store = Arc::new(MockLeagueStore::new());
        let season = store.add_season("Test");
        let use_case = AdvanceWeekUseCaseImpl::new(store.clone(), store.clone());
        assert_eq!(use_case.advance_week(season.id).await.unwrap(), 2);
    }
}

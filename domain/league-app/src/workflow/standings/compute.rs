use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        SeasonId,
        r#match::MatchRepository,
        player::PlayerRepository,
        standings::{StandingRow, StandingsScope},
    },
    workflow::standings::load_standings,
};

#[async_trait::async_trait]
pub trait GetStandingsUseCase {
    async fn get_standings(
        &self,
        season_id: SeasonId,
        scope: StandingsScope,
    ) -> Result<Vec<StandingRow>, GetStandingsError>;
}

#[derive(Debug, Error)]
pub enum GetStandingsError {
    #[error("standings are unavailable right now")]
    Internal,
}

pub struct GetStandingsUseCaseImpl<P: PlayerRepository, M: MatchRepository> {
    player_repo: Arc<P>,
    match_repo: Arc<M>,
}

impl<P: PlayerRepository, M: MatchRepository> GetStandingsUseCaseImpl<P, M> {
    pub fn new(player_repo: Arc<P>, match_repo: Arc<M>) -> Self {
        Self {
            player_repo,
            match_repo,
        }
    }
}

#[async_trait::async_trait]
impl<P, M> GetStandingsUseCase for GetStandingsUseCaseImpl<P, M>
where
    P: PlayerRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
{
    async fn get_standings(
        &self,
        season_id: SeasonId,
        scope: StandingsScope,
    ) -> Result<Vec<StandingRow>, GetStandingsError> {
        load_standings(
            self.player_repo.as_ref(),
            self.match_repo.as_ref(),
            season_id,
            scope,
        )
        .await
        .map_err(|e| {
            log::error!(
                "Failed to compute {:?} standings for season {}: {}",
                scope,
                season_id,
                e
            );
            GetStandingsError::Internal
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{
            fixture::Fixture,
            r#match::{MatchRepository, winner_of},
        },
        mock::MockLeagueStore,
    };

    use super::*;

    #[tokio::test]
    async fn test_weekly_and_cumulative_scopes() {
        let store = Arc::new(MockLeagueStore::new());
        let season = store.add_season("Test");
        let a = store.add_player("A", true);
        let b = store.add_player("B", true);
        let c = store.add_player("C", true);
        store.add_player("Benched", false);

        let week1 = store
            .create_week_matches(
                season.id,
                1,
                &[Fixture {
                    match_number: 1,
                    player1: a.id,
                    player2: b.id,
                }],
            )
            .await
            .unwrap();
        let week2 = store
            .create_week_matches(
                season.id,
                2,
                &[Fixture {
                    match_number: 1,
                    player1: c.id,
                    player2: a.id,
                }],
            )
            .await
            .unwrap();
        store
            .record_result(week1[0].id, 2, 0, winner_of(a.id, b.id, 2, 0))
            .await
            .unwrap();
        store
            .record_result(week2[0].id, 1, 1, None)
            .await
            .unwrap();

        let use_case = GetStandingsUseCaseImpl::new(store.clone(), store.clone());

        let weekly = use_case
            .get_standings(season.id, StandingsScope::Week(2))
            .await
            .unwrap();
        assert_eq!(weekly.len(), 3);
        assert!(weekly.iter().all(|r| r.points == 1 || r.player_name == "B"));

        let cumulative = use_case
            .get_standings(season.id, StandingsScope::Season)
            .await
            .unwrap();
        assert_eq!(cumulative[0].player_name, "A");
        assert_eq!(cumulative[0].points, 4);
        assert_eq!(cumulative[0].matches_played, 2);
        assert!(cumulative.iter().all(|r| r.player_name != "Benched"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let store = Arc::new(MockLeagueStore::new());
        let season = store.add_season("Test");
        store.fail_storage();
        let use_case = GetStandingsUseCaseImpl::new(store.clone(), store.clone());
        assert!(matches!(
            use_case
                .get_standings(season.id, StandingsScope::Season)
                .await,
            Err(GetStandingsError::Internal)
        ));
    }
}

use crate::domain::{
    RepoError, SeasonId,
    r#match::MatchRepository,
    player::{PlayerFilter, PlayerRepository},
    standings::{StandingRow, StandingsScope, compute_standings},
};

pub mod compute;
pub mod persist;

/// Ranked rows for every active player over the completed matches in scope.
pub(crate) async fn load_standings<P, M>(
    player_repo: &P,
    match_repo: &M,
    season_id: SeasonId,
    scope: StandingsScope,
) -> Result<Vec<StandingRow>, RepoError>
where
    P: PlayerRepository + Send + Sync + ?Sized,
    M: MatchRepository + Send + Sync + ?Sized,
{
    let players = player_repo.list_players(PlayerFilter::active()).await?;
    let matches = match_repo
        .list_completed_matches(season_id, scope.week_number())
        .await?;
    Ok(compute_standings(&players, &matches))
}

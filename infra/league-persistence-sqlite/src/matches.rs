use chrono::Utc;
use league_app::domain::{
    MatchId, PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, SeasonId,
    fixture::Fixture,
    r#match::{Match, MatchRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::is_unique_violation;

pub struct SqliteMatchRepository {
    pool: Pool<Sqlite>,
}

impl SqliteMatchRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn match_from_row(row: &SqliteRow) -> sqlx::Result<Match> {
        let winner_id: Option<i64> = row.try_get("winner_id")?;
        Ok(Match {
            id: MatchId(row.try_get("id")?),
            season_id: SeasonId(row.try_get("season_id")?),
            week_number: row.try_get("week_number")?,
            match_number: row.try_get("match_number")?,
            date: row.try_get("date")?,
            player1_id: PlayerId(row.try_get("player1_id")?),
            player2_id: PlayerId(row.try_get("player2_id")?),
            player1_score: row.try_get("player1_score")?,
            player2_score: row.try_get("player2_score")?,
            is_completed: row.try_get("is_completed")?,
            winner_id: winner_id.map(PlayerId),
        })
    }

    fn matches_from_rows(rows: Vec<SqliteRow>) -> Result<Vec<Match>, RepoError> {
        rows.iter()
            .map(|row| Self::match_from_row(row).map_err(|e| RepoError::StorageError(e.to_string())))
            .collect()
    }
}

#[async_trait::async_trait]
impl MatchRepository for SqliteMatchRepository {
    async fn list_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
    ) -> Result<Vec<Match>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM matches WHERE season_id = ? AND week_number = ? ORDER BY match_number",
        )
        .bind(season_id.0)
        .bind(week_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Self::matches_from_rows(rows)
    }

    async fn list_completed_matches(
        &self,
        season_id: SeasonId,
        week_number: Option<u32>,
    ) -> Result<Vec<Match>, RepoError> {
        let mut query =
            "SELECT * FROM matches WHERE season_id = ? AND is_completed = 1".to_string();
        if week_number.is_some() {
            query.push_str(" AND week_number = ?");
        }
        query.push_str(" ORDER BY week_number, match_number");

        let mut query = sqlx::query(&query).bind(season_id.0);
        if let Some(week) = week_number {
            query = query.bind(week);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Self::matches_from_rows(rows)
    }

    async fn get_match(&self, id: MatchId) -> Result<Match, RepoRetrieveError> {
        let row = sqlx::query("SELECT * FROM matches WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::match_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn has_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
    ) -> Result<bool, RepoError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE season_id = ? AND week_number = ?)",
        )
        .bind(season_id.0)
        .bind(week_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn create_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
        fixtures: &[Fixture],
    ) -> Result<Vec<Match>, RepoCreateError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;

        let scheduled: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE season_id = ? AND week_number = ?)",
        )
        .bind(season_id.0)
        .bind(week_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
        if scheduled {
            return Err(RepoCreateError::Conflict);
        }

        let date = Utc::now();
        let mut created = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let res = sqlx::query(
                "INSERT INTO matches (season_id, week_number, match_number, date, player1_id, player2_id, is_completed) VALUES (?, ?, ?, ?, ?, ?, 0)",
            )
            .bind(season_id.0)
            .bind(week_number)
            .bind(fixture.match_number)
            .bind(date)
            .bind(fixture.player1.0)
            .bind(fixture.player2.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepoCreateError::Conflict
                } else {
                    RepoCreateError::StorageError(e.to_string())
                }
            })?;

            created.push(Match {
                id: MatchId(res.last_insert_rowid()),
                season_id,
                week_number,
                match_number: fixture.match_number,
                date,
                player1_id: fixture.player1,
                player2_id: fixture.player2,
                player1_score: None,
                player2_score: None,
                is_completed: false,
                winner_id: None,
            });
        }

        tx.commit()
            .await
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
        Ok(created)
    }

    async fn record_result(
        &self,
        id: MatchId,
        player1_score: i64,
        player2_score: i64,
        winner_id: Option<PlayerId>,
    ) -> Result<Match, RepoUpdateError> {
        let row = sqlx::query(
            "UPDATE matches SET player1_score = ?, player2_score = ?, is_completed = 1, winner_id = ? WHERE id = ? RETURNING *",
        )
        .bind(player1_score)
        .bind(player2_score)
        .bind(winner_id.map(|w| w.0))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
        .ok_or(RepoUpdateError::NotFound)?;
        Self::match_from_row(&row).map_err(|e| RepoUpdateError::StorageError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use league_app::domain::{player::PlayerRepository, season::SeasonRepository};

    use crate::{SqlitePlayerRepository, SqliteSeasonRepository, create_test_pool};

    use super::*;

    async fn setup() -> (SqliteMatchRepository, SeasonId, Vec<PlayerId>) {
        let pool = create_test_pool().await;
        let players = SqlitePlayerRepository::new(pool.clone());
        let seasons = SqliteSeasonRepository::new(pool.clone());
        let season = seasons.create_season("S", Utc::now()).await.unwrap();
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            ids.push(players.create_player(name, true).await.unwrap().id);
        }
        (SqliteMatchRepository::new(pool), season.id, ids)
    }

    fn fixtures(ids: &[PlayerId]) -> Vec<Fixture> {
        vec![
            Fixture {
                match_number: 2,
                player1: ids[1],
                player2: ids[2],
            },
            Fixture {
                match_number: 1,
                player1: ids[0],
                player2: ids[1],
            },
        ]
    }

    #[tokio::test]
    async fn test_create_and_list_week() {
        let (repo, season_id, ids) = setup().await;
        assert!(!repo.has_week_matches(season_id, 1).await.unwrap());

        let created = repo
            .create_week_matches(season_id, 1, &fixtures(&ids))
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert!(repo.has_week_matches(season_id, 1).await.unwrap());

        let week = repo.list_week_matches(season_id, 1).await.unwrap();
        let numbers: Vec<u32> = week.iter().map(|m| m.match_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(week.iter().all(|m| !m.is_completed && m.player1_score.is_none()));
        assert!(repo.list_week_matches(season_id, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_week_cannot_be_created_twice() {
        let (repo, season_id, ids) = setup().await;
        repo.create_week_matches(season_id, 1, &fixtures(&ids))
            .await
            .unwrap();
        assert!(matches!(
            repo.create_week_matches(season_id, 1, &fixtures(&ids)).await,
            Err(RepoCreateError::Conflict)
        ));
        assert_eq!(repo.list_week_matches(season_id, 1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_whole_week() {
        let (repo, season_id, ids) = setup().await;
        let mut bad = fixtures(&ids);
        bad.push(Fixture {
            match_number: 3,
            player1: ids[2],
            player2: ids[2],
        });
        assert!(repo.create_week_matches(season_id, 1, &bad).await.is_err());
        assert!(!repo.has_week_matches(season_id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_result_and_completed_filter() {
        let (repo, season_id, ids) = setup().await;
        let week1 = repo
            .create_week_matches(season_id, 1, &fixtures(&ids))
            .await
            .unwrap();
        let week2 = repo
            .create_week_matches(season_id, 2, &fixtures(&ids))
            .await
            .unwrap();

        let updated = repo
            .record_result(week1[0].id, 3, 1, Some(ids[1]))
            .await
            .unwrap();
        assert!(updated.is_completed);
        assert_eq!(updated.player1_score, Some(3));
        assert_eq!(updated.winner_id, Some(ids[1]));

        let redraw = repo.record_result(week1[0].id, 1, 1, None).await.unwrap();
        assert_eq!(redraw.winner_id, None);

        repo.record_result(week2[1].id, 0, 2, Some(ids[1]))
            .await
            .unwrap();

        assert_eq!(
            repo.list_completed_matches(season_id, Some(1))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            repo.list_completed_matches(season_id, None)
                .await
                .unwrap()
                .len(),
            2
        );
        assert!(matches!(
            repo.record_result(MatchId(999), 1, 0, None).await,
            Err(RepoUpdateError::NotFound)
        ));
        assert!(matches!(
            repo.get_match(MatchId(999)).await,
            Err(RepoRetrieveError::NotFound)
        ));
    }
}

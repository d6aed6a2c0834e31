use league_app::domain::{
    RepoError, SeasonId,
    standings::{StandingRow, StandingsRepository},
};
use sqlx::{Pool, Sqlite};

pub struct SqliteStandingsRepository {
    pool: Pool<Sqlite>,
}

impl SqliteStandingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StandingsRepository for SqliteStandingsRepository {
    async fn upsert_weekly_standings(
        &self,
        season_id: SeasonId,
        week_number: u32,
        rows: &[StandingRow],
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        // Rows of players no longer active are dropped with the rest.
        sqlx::query("DELETE FROM weekly_standings WHERE season_id = ? AND week_number = ?")
            .bind(season_id.0)
            .bind(week_number)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        for row in rows {
            sqlx::query(
                "INSERT INTO weekly_standings (season_id, player_id, week_number, matches_played, wins, draws, losses, goals_for, goals_against, goal_difference, points, goal_average) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(season_id.0)
            .bind(row.player_id.0)
            .bind(week_number)
            .bind(row.matches_played)
            .bind(row.wins)
            .bind(row.draws)
            .bind(row.losses)
            .bind(row.goals_for)
            .bind(row.goals_against)
            .bind(row.goal_difference)
            .bind(row.points)
            .bind(row.goal_average)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }
}

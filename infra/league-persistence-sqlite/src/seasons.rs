use chrono::{DateTime, Utc};
use league_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, SeasonId,
    season::{Season, SeasonRepository, SeasonStatus},
};
use sqlx::{Pool, Row, Sqlite, SqliteConnection, sqlite::SqliteRow};

use crate::is_unique_violation;

pub struct SqliteSeasonRepository {
    pool: Pool<Sqlite>,
}

impl SqliteSeasonRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn season_from_row(row: &SqliteRow) -> sqlx::Result<Season> {
        let status: String = row.try_get("status")?;
        let status = SeasonStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown season status {:?}", status).into(),
        })?;
        Ok(Season {
            id: SeasonId(row.try_get("id")?),
            name: row.try_get("name")?,
            start_date: row.try_get("start_date")?,
            current_week: row.try_get("current_week")?,
            is_active: row.try_get("is_active")?,
            status,
        })
    }
}

async fn insert_season(
    conn: &mut SqliteConnection,
    name: &str,
    start_date: DateTime<Utc>,
) -> sqlx::Result<Season> {
    let res = sqlx::query(
        "INSERT INTO seasons (name, start_date, current_week, is_active, status) VALUES (?, ?, 1, 1, ?)",
    )
    .bind(name)
    .bind(start_date)
    .bind(SeasonStatus::InProgress.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(Season {
        id: SeasonId(res.last_insert_rowid()),
        name: name.to_string(),
        start_date,
        current_week: 1,
        is_active: true,
        status: SeasonStatus::InProgress,
    })
}

#[async_trait::async_trait]
impl SeasonRepository for SqliteSeasonRepository {
    async fn get_active_season(&self) -> Result<Option<Season>, RepoError> {
        let row = sqlx::query("SELECT * FROM seasons WHERE is_active = 1 ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        row.map(|row| Self::season_from_row(&row))
            .transpose()
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn get_season(&self, id: SeasonId) -> Result<Season, RepoRetrieveError> {
        let row = sqlx::query("SELECT * FROM seasons WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::season_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn list_seasons(&self) -> Result<Vec<Season>, RepoError> {
        let rows = sqlx::query("SELECT * FROM seasons ORDER BY start_date DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Self::season_from_row(row).map_err(|e| RepoError::StorageError(e.to_string()))
            })
            .collect()
    }

    async fn create_season(
        &self,
        name: &str,
        start_date: DateTime<Utc>,
    ) -> Result<Season, RepoCreateError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
        insert_season(&mut conn, name, start_date)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    log::warn!("Season {} not created, another season is already active", name);
                    RepoCreateError::Conflict
                } else {
                    RepoCreateError::StorageError(e.to_string())
                }
            })
    }

    async fn roll_over(&self, name: &str, start_date: DateTime<Utc>) -> Result<Season, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        sqlx::query("UPDATE seasons SET is_active = 0, status = ? WHERE is_active = 1")
            .bind(SeasonStatus::Finished.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        let season = insert_season(&mut tx, name, start_date)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(season)
    }

    async fn advance_week(&self, id: SeasonId) -> Result<u32, RepoUpdateError> {
        let week: Option<u32> = sqlx::query_scalar(
            "UPDATE seasons SET current_week = current_week + 1 WHERE id = ? RETURNING current_week",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
        week.ok_or(RepoUpdateError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::create_test_pool;

    use super::*;

    #[tokio::test]
    async fn test_create_and_get_active() {
        let repo = SqliteSeasonRepository::new(create_test_pool().await);
        assert!(repo.get_active_season().await.unwrap().is_none());

        let season = repo.create_season("FC 26 Season 2025", Utc::now()).await.unwrap();
        let active = repo.get_active_season().await.unwrap().unwrap();
        assert_eq!(active.id, season.id);
        assert_eq!(active.current_week, 1);
        assert_eq!(active.status, SeasonStatus::InProgress);
    }

    #[tokio::test]
    async fn test_roll_over_keeps_one_active_season() {
        let repo = SqliteSeasonRepository::new(create_test_pool().await);
        let start = Utc::now();
        let old = repo.create_season("Old", start).await.unwrap();
        let new = repo.roll_over("New", start + Duration::days(1)).await.unwrap();

        let seasons = repo.list_seasons().await.unwrap();
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].id, new.id);
        assert_eq!(seasons.iter().filter(|s| s.is_active).count(), 1);

        let old = repo.get_season(old.id).await.unwrap();
        assert!(!old.is_active);
        assert_eq!(old.status, SeasonStatus::Finished);
        assert_eq!(repo.get_active_season().await.unwrap().unwrap().id, new.id);
    }

    #[tokio::test]
    async fn test_second_active_season_conflicts() {
        let repo = SqliteSeasonRepository::new(create_test_pool().await);
        let first = repo.create_season("First", Utc::now()).await.unwrap();
        assert!(matches!(
            repo.create_season("Second", Utc::now()).await,
            Err(RepoCreateError::Conflict)
        ));

        let seasons = repo.list_seasons().await.unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(repo.get_active_season().await.unwrap().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_advance_week() {
        let repo = SqliteSeasonRepository::new(create_test_pool().await);
        let season = repo.create_season("S", Utc::now()).await.unwrap();
        assert_eq!(repo.advance_week(season.id).await.unwrap(), 2);
        assert_eq!(repo.advance_week(season.id).await.unwrap(), 3);
        assert_eq!(repo.get_season(season.id).await.unwrap().current_week, 3);
        assert!(matches!(
            repo.advance_week(SeasonId(42)).await,
            Err(RepoUpdateError::NotFound)
        ));
    }
}

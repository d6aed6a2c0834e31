use chrono::Utc;
use league_app::domain::{
    PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
    player::{Player, PlayerFilter, PlayerRepository, RosterRename},
};
use sqlx::{Pool, Row, Sqlite, SqliteConnection, sqlite::SqliteRow};

use crate::is_unique_violation;

pub struct SqlitePlayerRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePlayerRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &SqliteRow) -> sqlx::Result<Player> {
        Ok(Player {
            id: PlayerId(row.try_get("id")?),
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            created_date: row.try_get("created_date")?,
        })
    }
}

/// Deletes a placeholder player. One that already appears in matches is
/// deactivated instead so its history stays intact.
async fn retire_player(conn: &mut SqliteConnection, name: &str) -> sqlx::Result<bool> {
    let played: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM matches m JOIN players p ON p.id IN (m.player1_id, m.player2_id) WHERE p.name = ?)",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    let res = if played {
        log::info!("Placeholder {} has matches, deactivating instead of deleting", name);
        sqlx::query("UPDATE players SET is_active = 0 WHERE name = ?")
            .bind(name)
            .execute(&mut *conn)
            .await?
    } else {
        sqlx::query("DELETE FROM players WHERE name = ?")
            .bind(name)
            .execute(&mut *conn)
            .await?
    };
    Ok(res.rows_affected() > 0)
}

/// Creates `name` as an active player unless a player with that name exists.
async fn ensure_player(conn: &mut SqliteConnection, name: &str) -> sqlx::Result<bool> {
    let res = sqlx::query(
        "INSERT INTO players (name, is_active, created_date) VALUES (?, 1, ?) ON CONFLICT (name) DO NOTHING",
    )
    .bind(name)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected() > 0)
}

#[async_trait::async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, RepoError> {
        let mut query = "SELECT * FROM players".to_string();
        if filter.is_active.is_some() {
            query.push_str(" WHERE is_active = ?");
        }
        query.push_str(" ORDER BY id");

        let mut query = sqlx::query(&query);
        if let Some(is_active) = filter.is_active {
            query = query.bind(is_active);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Self::player_from_row(row).map_err(|e| RepoError::StorageError(e.to_string()))
            })
            .collect()
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::player_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn find_player_by_name(&self, name: &str) -> Result<Option<Player>, RepoError> {
        let row = sqlx::query("SELECT * FROM players WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        row.map(|row| Self::player_from_row(&row))
            .transpose()
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn count_active_players(&self) -> Result<usize, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(count as usize)
    }

    async fn create_player(&self, name: &str, is_active: bool) -> Result<Player, RepoCreateError> {
        let created_date = Utc::now();
        let res = sqlx::query("INSERT INTO players (name, is_active, created_date) VALUES (?, ?, ?)")
            .bind(name)
            .bind(is_active)
            .bind(created_date)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepoCreateError::Conflict
                } else {
                    RepoCreateError::StorageError(e.to_string())
                }
            })?;

        Ok(Player {
            id: PlayerId(res.last_insert_rowid()),
            name: name.to_string(),
            is_active,
            created_date,
        })
    }

    async fn set_active(&self, id: PlayerId, is_active: bool) -> Result<(), RepoUpdateError> {
        let res = sqlx::query("UPDATE players SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
        if res.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }

    async fn seed_roster(&self, remove: &[&str], ensure: &[&str]) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        for name in remove {
            retire_player(&mut tx, name)
                .await
                .map_err(|e| RepoError::StorageError(e.to_string()))?;
        }
        for name in ensure {
            ensure_player(&mut tx, name)
                .await
                .map_err(|e| RepoError::StorageError(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn migrate_roster_names(
        &self,
        renames: &[RosterRename],
        ensure: &[&str],
    ) -> Result<usize, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        let mut changed = 0;

        for rename in renames {
            let target_exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM players WHERE name = ?)")
                    .bind(&rename.to)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| RepoError::StorageError(e.to_string()))?;

            if target_exists {
                retire_player(&mut tx, &rename.from)
                    .await
                    .map_err(|e| RepoError::StorageError(e.to_string()))?;
                continue;
            }

            let res = sqlx::query("UPDATE players SET name = ? WHERE name = ?")
                .bind(&rename.to)
                .bind(&rename.from)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::StorageError(e.to_string()))?;
            changed += res.rows_affected() as usize;
        }

        for name in ensure {
            if ensure_player(&mut tx, name)
                .await
                .map_err(|e| RepoError::StorageError(e.to_string()))?
            {
                changed += 1;
            }
        }

        // Dropping the transaction without commit rolls every step back.
        tx.commit()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(changed)
    }
}

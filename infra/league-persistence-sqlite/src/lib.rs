use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub mod matches;
pub mod players;
pub mod seasons;
pub mod standings;

pub use matches::SqliteMatchRepository;
pub use players::SqlitePlayerRepository;
pub use seasons::SqliteSeasonRepository;
pub use standings::SqliteStandingsRepository;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seasons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    start_date TEXT NOT NULL,
    current_week INTEGER NOT NULL DEFAULT 1,
    is_active INTEGER NOT NULL DEFAULT 1,
    status TEXT NOT NULL DEFAULT 'in_progress'
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_seasons_single_active ON seasons (is_active) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    week_number INTEGER NOT NULL,
    match_number INTEGER NOT NULL,
    date TEXT NOT NULL,
    player1_id INTEGER NOT NULL REFERENCES players(id),
    player2_id INTEGER NOT NULL REFERENCES players(id),
    player1_score INTEGER,
    player2_score INTEGER,
    is_completed INTEGER NOT NULL DEFAULT 0,
    winner_id INTEGER REFERENCES players(id),
    CHECK (player1_id <> player2_id),
    UNIQUE (season_id, week_number, match_number)
);

CREATE INDEX IF NOT EXISTS idx_matches_season_week ON matches (season_id, week_number);

CREATE TABLE IF NOT EXISTS weekly_standings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    week_number INTEGER NOT NULL,
    matches_played INTEGER NOT NULL DEFAULT 0,
    wins INTEGER NOT NULL DEFAULT 0,
    draws INTEGER NOT NULL DEFAULT 0,
    losses INTEGER NOT NULL DEFAULT 0,
    goals_for INTEGER NOT NULL DEFAULT 0,
    goals_against INTEGER NOT NULL DEFAULT 0,
    goal_difference INTEGER NOT NULL DEFAULT 0,
    points INTEGER NOT NULL DEFAULT 0,
    goal_average REAL NOT NULL DEFAULT 0.0,
    UNIQUE (season_id, player_id, week_number)
);
"#;

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Table names in the order the backup report lists them.
pub const TABLES: [&str; 4] = ["players", "seasons", "matches", "weekly_standings"];

/// Opens the league database, creating the file if it does not exist yet.
pub async fn create_db_pool(db_path: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(conn_options)
        .await
}

pub async fn ensure_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Single-connection in-memory database with the schema applied.
pub async fn create_memory_pool() -> Result<Pool<Sqlite>, sqlx::Error> {
    let conn_options = "sqlite::memory:".parse::<SqliteConnectOptions>()?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(conn_options)
        .await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn create_test_pool() -> Pool<Sqlite> {
    create_memory_pool().await.unwrap()
}

use chrono::{DateTime, Datelike, Utc};

use crate::domain::{RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, SeasonId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeasonStatus {
    InProgress,
    Finished,
}

impl SeasonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonStatus::InProgress => "in_progress",
            SeasonStatus::Finished => "finished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(SeasonStatus::InProgress),
            "finished" => Some(SeasonStatus::Finished),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub current_week: u32,
    pub is_active: bool,
    pub status: SeasonStatus,
}

/// Name of the season opened automatically when none is active.
pub fn opening_season_name(league_name: &str, now: DateTime<Utc>) -> String {
    format!("{} Season {}", league_name, now.year())
}

/// Name of a season started by a rollover.
pub fn rollover_season_name(league_name: &str, now: DateTime<Utc>) -> String {
    format!("{} Season {}-{:02}", league_name, now.year(), now.month())
}

#[async_trait::async_trait]
pub trait SeasonRepository {
    async fn get_active_season(&self) -> Result<Option<Season>, RepoError>;
    async fn get_season(&self, id: SeasonId) -> Result<Season, RepoRetrieveError>;

    /// All seasons, newest start date first.
    async fn list_seasons(&self) -> Result<Vec<Season>, RepoError>;

    /// Creates an active, in-progress season at week 1. Fails with
    /// `Conflict` while another season is active.
    async fn create_season(
        &self,
        name: &str,
        start_date: DateTime<Utc>,
    ) -> Result<Season, RepoCreateError>;

    /// Finishes whichever season is active and creates the new active season,
    /// atomically.
    async fn roll_over(&self, name: &str, start_date: DateTime<Utc>) -> Result<Season, RepoError>;

    /// Increments the current week and returns the new value.
    async fn advance_week(&self, id: SeasonId) -> Result<u32, RepoUpdateError>;
}

use chrono::{DateTime, Utc};

use crate::domain::{PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError};

/// Names the league opens its first season with.
pub const DEFAULT_ROSTER: [&str; 5] = ["ABOUBACAR", "DIOGO", "LIONEL", "CHERIF", "ELI"];

/// Placeholder names older databases were seeded with, in roster order.
pub const LEGACY_ROSTER: [&str; 5] = ["Joueur 1", "Joueur 2", "Joueur 3", "Joueur 4", "Joueur 5"];

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerFilter {
    pub is_active: Option<bool>,
}

impl PlayerFilter {
    pub fn active() -> Self {
        Self {
            is_active: Some(true),
        }
    }

    pub fn inactive() -> Self {
        Self {
            is_active: Some(false),
        }
    }
}

/// One placeholder-to-real-name rename applied by a roster migration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRename {
    pub from: String,
    pub to: String,
}

pub fn legacy_renames() -> Vec<RosterRename> {
    LEGACY_ROSTER
        .iter()
        .zip(DEFAULT_ROSTER.iter())
        .map(|(from, to)| RosterRename {
            from: from.to_string(),
            to: to.to_string(),
        })
        .collect()
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    /// Players matching the filter, ordered by id.
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, RepoError>;
    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError>;
    async fn find_player_by_name(&self, name: &str) -> Result<Option<Player>, RepoError>;
    async fn count_active_players(&self) -> Result<usize, RepoError>;
    async fn create_player(&self, name: &str, is_active: bool) -> Result<Player, RepoCreateError>;
    async fn set_active(&self, id: PlayerId, is_active: bool) -> Result<(), RepoUpdateError>;

    /// Removes the `remove` players if present and creates every missing
    /// `ensure` name as an active player. A stored backend may deactivate a
    /// removed player instead when matches still reference it.
    async fn seed_roster(&self, remove: &[&str], ensure: &[&str]) -> Result<(), RepoError>;

    /// Applies the renames, deleting a placeholder whose target name already
    /// exists, then creates every missing `ensure` name. Runs as one
    /// transaction and returns the number of renamed or created players.
    async fn migrate_roster_names(
        &self,
        renames: &[RosterRename],
        ensure: &[&str],
    ) -> Result<usize, RepoError>;
}

use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Utc};

use crate::domain::{
    MatchId, PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, SeasonId,
    fixture::Fixture,
    r#match::{Match, MatchRepository},
    player::{Player, PlayerFilter, PlayerRepository, RosterRename},
    season::{Season, SeasonRepository, SeasonStatus},
    standings::{StandingRow, StandingsRepository},
};

#[derive(Default)]
struct MockState {
    players: Vec<Player>,
    seasons: Vec<Season>,
    matches: Vec<Match>,
    standings: Vec<(SeasonId, u32, StandingRow)>,
    next_id: i64,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_player(&mut self, name: &str, is_active: bool) -> Player {
        let player = Player {
            id: PlayerId(self.next_id()),
            name: name.to_string(),
            is_active,
            created_date: Utc::now(),
        };
        self.players.push(player.clone());
        player
    }
}

/// In-memory stand-in for every repository port.
#[derive(Default)]
pub struct MockLeagueStore {
    state: Mutex<MockState>,
    failing: AtomicBool,
}

impl MockLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following call fails with a storage error.
    pub fn fail_storage(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            Err("storage offline".to_string())
        } else {
            Ok(())
        }
    }

    pub fn add_player(&self, name: &str, is_active: bool) -> Player {
        self.state.lock().unwrap().insert_player(name, is_active)
    }

    pub fn add_season(&self, name: &str) -> Season {
        let mut state = self.state.lock().unwrap();
        let season = Season {
            id: SeasonId(state.next_id()),
            name: name.to_string(),
            start_date: Utc::now(),
            current_week: 1,
            is_active: true,
            status: SeasonStatus::InProgress,
        };
        state.seasons.push(season.clone());
        season
    }

    pub fn players(&self) -> Vec<Player> {
        self.state.lock().unwrap().players.clone()
    }

    pub fn seasons(&self) -> Vec<Season> {
        self.state.lock().unwrap().seasons.clone()
    }

    pub fn matches(&self) -> Vec<Match> {
        self.state.lock().unwrap().matches.clone()
    }

    pub fn cached_standings(&self, season_id: SeasonId, week_number: u32) -> Vec<StandingRow> {
        self.state
            .lock()
            .unwrap()
            .standings
            .iter()
            .filter(|(s, w, _)| *s == season_id && *w == week_number)
            .map(|(_, _, row)| row.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockLeagueStore {
    async fn list_players(&self, filter: PlayerFilter) -> Result<Vec<Player>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        let mut players: Vec<Player> = state
            .players
            .iter()
            .filter(|p| filter.is_active.is_none_or(|active| p.is_active == active))
            .cloned()
            .collect();
        players.sort_by_key(|p| p.id);
        Ok(players)
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let state = self.state.lock().unwrap();
        state
            .players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn find_player_by_name(&self, name: &str) -> Result<Option<Player>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        Ok(state.players.iter().find(|p| p.name == name).cloned())
    }

    async fn count_active_players(&self) -> Result<usize, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        Ok(state.players.iter().filter(|p| p.is_active).count())
    }

    async fn create_player(&self, name: &str, is_active: bool) -> Result<Player, RepoCreateError> {
        self.check().map_err(RepoCreateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        if state.players.iter().any(|p| p.name == name) {
            return Err(RepoCreateError::Conflict);
        }
        Ok(state.insert_player(name, is_active))
    }

    async fn set_active(&self, id: PlayerId, is_active: bool) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let player = state
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoUpdateError::NotFound)?;
        player.is_active = is_active;
        Ok(())
    }

    async fn seed_roster(&self, remove: &[&str], ensure: &[&str]) -> Result<(), RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        state.players.retain(|p| !remove.contains(&p.name.as_str()));
        for name in ensure {
            if !state.players.iter().any(|p| p.name == *name) {
                state.insert_player(name, true);
            }
        }
        Ok(())
    }

    async fn migrate_roster_names(
        &self,
        renames: &[RosterRename],
        ensure: &[&str],
    ) -> Result<usize, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let mut changed = 0;
        for rename in renames {
            let Some(index) = state.players.iter().position(|p| p.name == rename.from) else {
                continue;
            };
            if state.players.iter().any(|p| p.name == rename.to) {
                state.players.remove(index);
            } else {
                state.players[index].name = rename.to.clone();
                changed += 1;
            }
        }
        for name in ensure {
            if !state.players.iter().any(|p| p.name == *name) {
                state.insert_player(name, true);
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait::async_trait]
impl SeasonRepository for MockLeagueStore {
    async fn get_active_season(&self) -> Result<Option<Season>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        Ok(state.seasons.iter().find(|s| s.is_active).cloned())
    }

    async fn get_season(&self, id: SeasonId) -> Result<Season, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let state = self.state.lock().unwrap();
        state
            .seasons
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_seasons(&self) -> Result<Vec<Season>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut seasons = self.state.lock().unwrap().seasons.clone();
        seasons.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(seasons)
    }

    async fn create_season(
        &self,
        name: &str,
        start_date: DateTime<Utc>,
    ) -> Result<Season, RepoCreateError> {
        self.check().map_err(RepoCreateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        if state.seasons.iter().any(|s| s.is_active) {
            return Err(RepoCreateError::Conflict);
        }
        let season = Season {
            id: SeasonId(state.next_id()),
            name: name.to_string(),
            start_date,
            current_week: 1,
            is_active: true,
            status: SeasonStatus::InProgress,
        };
        state.seasons.push(season.clone());
        Ok(season)
    }

    async fn roll_over(&self, name: &str, start_date: DateTime<Utc>) -> Result<Season, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        for season in state.seasons.iter_mut().filter(|s| s.is_active) {
            season.is_active = false;
            season.status = SeasonStatus::Finished;
        }
        let season = Season {
            id: SeasonId(state.next_id()),
            name: name.to_string(),
            start_date,
            current_week: 1,
            is_active: true,
            status: SeasonStatus::InProgress,
        };
        state.seasons.push(season.clone());
        Ok(season)
    }

    async fn advance_week(&self, id: SeasonId) -> Result<u32, RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let season = state
            .seasons
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RepoUpdateError::NotFound)?;
        season.current_week += 1;
        Ok(season.current_week)
    }
}

#[async_trait::async_trait]
impl MatchRepository for MockLeagueStore {
    async fn list_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
    ) -> Result<Vec<Match>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        let mut matches: Vec<Match> = state
            .matches
            .iter()
            .filter(|m| m.season_id == season_id && m.week_number == week_number)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.match_number);
        Ok(matches)
    }

    async fn list_completed_matches(
        &self,
        season_id: SeasonId,
        week_number: Option<u32>,
    ) -> Result<Vec<Match>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .matches
            .iter()
            .filter(|m| m.season_id == season_id && m.is_completed)
            .filter(|m| week_number.is_none_or(|week| m.week_number == week))
            .cloned()
            .collect())
    }

    async fn get_match(&self, id: MatchId) -> Result<Match, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let state = self.state.lock().unwrap();
        state
            .matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn has_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
    ) -> Result<bool, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .matches
            .iter()
            .any(|m| m.season_id == season_id && m.week_number == week_number))
    }

    async fn create_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
        fixtures: &[Fixture],
    ) -> Result<Vec<Match>, RepoCreateError> {
        self.check().map_err(RepoCreateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        if state
            .matches
            .iter()
            .any(|m| m.season_id == season_id && m.week_number == week_number)
        {
            return Err(RepoCreateError::Conflict);
        }
        let mut created = Vec::new();
        for fixture in fixtures {
            let m = Match {
                id: MatchId(state.next_id()),
                season_id,
                week_number,
                match_number: fixture.match_number,
                date: Utc::now(),
                player1_id: fixture.player1,
                player2_id: fixture.player2,
                player1_score: None,
                player2_score: None,
                is_completed: false,
                winner_id: None,
            };
            state.matches.push(m.clone());
            created.push(m);
        }
        Ok(created)
    }

    async fn record_result(
        &self,
        id: MatchId,
        player1_score: i64,
        player2_score: i64,
        winner_id: Option<PlayerId>,
    ) -> Result<Match, RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        let m = state
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepoUpdateError::NotFound)?;
        m.player1_score = Some(player1_score);
        m.player2_score = Some(player2_score);
        m.is_completed = true;
        m.winner_id = winner_id;
        Ok(m.clone())
    }
}

#[async_trait::async_trait]
impl StandingsRepository for MockLeagueStore {
    async fn upsert_weekly_standings(
        &self,
        season_id: SeasonId,
        week_number: u32,
        rows: &[StandingRow],
    ) -> Result<(), RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut state = self.state.lock().unwrap();
        state
            .standings
            .retain(|(s, w, _)| !(*s == season_id && *w == week_number));
        for row in rows {
            state.standings.push((season_id, week_number, row.clone()));
        }
        Ok(())
    }
}

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::{
    MatchId, PlayerId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, SeasonId,
    fixture::Fixture,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub season_id: SeasonId,
    pub week_number: u32,
    pub match_number: u32,
    pub date: DateTime<Utc>,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_score: Option<i64>,
    pub player2_score: Option<i64>,
    pub is_completed: bool,
    pub winner_id: Option<PlayerId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    pub fn from_scores(goals_for: i64, goals_against: i64) -> Self {
        match goals_for.cmp(&goals_against) {
            Ordering::Greater => MatchOutcome::Win,
            Ordering::Equal => MatchOutcome::Draw,
            Ordering::Less => MatchOutcome::Loss,
        }
    }
}

/// The player who scored more, `None` on a draw.
pub fn winner_of(
    player1_id: PlayerId,
    player2_id: PlayerId,
    player1_score: i64,
    player2_score: i64,
) -> Option<PlayerId> {
    match MatchOutcome::from_scores(player1_score, player2_score) {
        MatchOutcome::Win => Some(player1_id),
        MatchOutcome::Loss => Some(player2_id),
        MatchOutcome::Draw => None,
    }
}

impl Match {
    pub fn is_scored(&self) -> bool {
        self.player1_score.is_some() && self.player2_score.is_some()
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }

    /// Derived from the scores, never from the cached `winner_id`.
    pub fn winner(&self) -> Option<PlayerId> {
        match (self.player1_score, self.player2_score) {
            (Some(s1), Some(s2)) => winner_of(self.player1_id, self.player2_id, s1, s2),
            _ => None,
        }
    }

    /// Goals for and against from the given player's side, if they played in
    /// this match and it is scored.
    pub fn goals_for_player(&self, player_id: PlayerId) -> Option<(i64, i64)> {
        let (s1, s2) = (self.player1_score?, self.player2_score?);
        if self.player1_id == player_id {
            Some((s1, s2))
        } else if self.player2_id == player_id {
            Some((s2, s1))
        } else {
            None
        }
    }
}

#[async_trait::async_trait]
pub trait MatchRepository {
    /// Matches of one week, ordered by match number.
    async fn list_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
    ) -> Result<Vec<Match>, RepoError>;

    /// Completed matches of a season, optionally limited to one week.
    async fn list_completed_matches(
        &self,
        season_id: SeasonId,
        week_number: Option<u32>,
    ) -> Result<Vec<Match>, RepoError>;

    async fn get_match(&self, id: MatchId) -> Result<Match, RepoRetrieveError>;

    async fn has_week_matches(&self, season_id: SeasonId, week_number: u32)
    -> Result<bool, RepoError>;

    /// Inserts all fixtures of a week in one transaction. Fails with
    /// `Conflict` if the week already has matches.
    async fn create_week_matches(
        &self,
        season_id: SeasonId,
        week_number: u32,
        fixtures: &[Fixture],
    ) -> Result<Vec<Match>, RepoCreateError>;

    /// Stores both scores, marks the match completed and caches the winner.
    async fn record_result(
        &self,
        id: MatchId,
        player1_score: i64,
        player2_score: i64,
        winner_id: Option<PlayerId>,
    ) -> Result<Match, RepoUpdateError>;
}

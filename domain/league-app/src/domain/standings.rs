//! Standings tables derived from completed matches.
//!
//! Rows are ranked by points, then goal average, then goal difference, all
//! descending. The sort is stable, so players tied on all three keys keep the
//! order they were aggregated in (roster order by id); nothing beyond the three
//! keys is defined.

use crate::domain::{
    PlayerId, RepoError, SeasonId,
    r#match::{Match, MatchOutcome},
    player::Player,
};

pub const POINTS_PER_WIN: u32 = 3;
pub const POINTS_PER_DRAW: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandingsScope {
    Week(u32),
    Season,
}

impl StandingsScope {
    pub fn week_number(&self) -> Option<u32> {
        match self {
            StandingsScope::Week(week) => Some(*week),
            StandingsScope::Season => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StandingRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: u32,
    /// Goals for per match played, rounded to two decimals; 0.0 before the
    /// first match.
    pub goal_average: f64,
}

impl StandingRow {
    pub fn empty(player: &Player) -> Self {
        Self {
            player_id: player.id,
            player_name: player.name.clone(),
            matches_played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            goal_average: 0.0,
        }
    }

    fn record(&mut self, goals_for: i64, goals_against: i64) {
        self.matches_played += 1;
        // Scores are stored unchecked, so totals saturate instead of overflowing.
        self.goals_for = self.goals_for.saturating_add(goals_for);
        self.goals_against = self.goals_against.saturating_add(goals_against);
        match MatchOutcome::from_scores(goals_for, goals_against) {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Draw => self.draws += 1,
            MatchOutcome::Loss => self.losses += 1,
        }
    }

    /// Recomputes the cached fields from the raw counters.
    pub fn finish(&mut self) {
        self.goal_difference = self.goals_for.saturating_sub(self.goals_against);
        self.points = self.wins * POINTS_PER_WIN + self.draws * POINTS_PER_DRAW;
        self.goal_average = goal_average(self.goals_for, self.matches_played);
    }
}

pub fn goal_average(goals_for: i64, matches_played: u32) -> f64 {
    if matches_played == 0 {
        return 0.0;
    }
    let average = goals_for as f64 / matches_played as f64;
    (average * 100.0).round() / 100.0
}

/// One row per player, in the order given, aggregated over the completed
/// matches in `matches`. Matches without both scores are ignored.
pub fn aggregate_standings(players: &[Player], matches: &[Match]) -> Vec<StandingRow> {
    players
        .iter()
        .map(|player| {
            let mut row = StandingRow::empty(player);
            for m in matches.iter().filter(|m| m.is_completed) {
                if let Some((goals_for, goals_against)) = m.goals_for_player(player.id) {
                    row.record(goals_for, goals_against);
                }
            }
            row.finish();
            row
        })
        .collect()
}

pub fn rank_standings(rows: &mut [StandingRow]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_average.total_cmp(&a.goal_average))
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
    });
}

/// Aggregates and ranks in one step.
pub fn compute_standings(players: &[Player], matches: &[Match]) -> Vec<StandingRow> {
    let mut rows = aggregate_standings(players, matches);
    rank_standings(&mut rows);
    rows
}

/// Cache of weekly rows. Never authoritative: rows can always be recomputed
/// from the matches.
#[async_trait::async_trait]
pub trait StandingsRepository {
    async fn upsert_weekly_standings(
        &self,
        season_id: SeasonId,
        week_number: u32,
        rows: &[StandingRow],
    ) -> Result<(), RepoError>;
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::MatchId;

    fn player(id: i64, name: &str) -> Player {
        Player {
            id: PlayerId(id),
            name: name.to_string(),
            is_active: true,
            created_date: Utc::now(),
        }
    }

    fn result(id: i64, week: u32, p1: i64, p2: i64, s1: i64, s2: i64) -> Match {
        Match {
            id: MatchId(id),
            season_id: SeasonId(1),
            week_number: week,
            match_number: id as u32,
            date: Utc::now(),
            player1_id: PlayerId(p1),
            player2_id: PlayerId(p2),
            player1_score: Some(s1),
            player2_score: Some(s2),
            is_completed: true,
            winner_id: None,
        }
    }

    fn roster() -> Vec<Player> {
        vec![
            player(1, "A"),
            player(2, "B"),
            player(3, "C"),
            player(4, "D"),
            player(5, "E"),
        ]
    }

    fn row<'a>(rows: &'a [StandingRow], name: &str) -> &'a StandingRow {
        rows.iter().find(|r| r.player_name == name).unwrap()
    }

    #[test]
    fn test_five_results_reproduce_exact_rows() {
        let matches = vec![
            result(1, 1, 1, 2, 3, 1), // A beats B
            result(2, 1, 2, 3, 2, 2), // B draws C
            result(3, 1, 4, 5, 1, 0), // D beats E
            result(4, 1, 3, 1, 2, 0), // C beats A
            result(5, 1, 4, 2, 4, 0), // D beats B
        ];
        let rows = compute_standings(&roster(), &matches);

        let names: Vec<&str> = rows.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["D", "C", "A", "B", "E"]);

        let a = row(&rows, "A");
        assert_eq!(
            (a.matches_played, a.wins, a.draws, a.losses),
            (2, 1, 0, 1)
        );
        assert_eq!((a.goals_for, a.goals_against, a.goal_difference), (3, 3, 0));
        assert_eq!((a.points, a.goal_average), (3, 1.5));

        let b = row(&rows, "B");
        assert_eq!(
            (b.matches_played, b.wins, b.draws, b.losses),
            (3, 0, 1, 2)
        );
        assert_eq!((b.goals_for, b.goals_against, b.goal_difference), (3, 9, -6));
        assert_eq!((b.points, b.goal_average), (1, 1.0));

        let c = row(&rows, "C");
        assert_eq!(
            (c.matches_played, c.wins, c.draws, c.losses),
            (2, 1, 1, 0)
        );
        assert_eq!((c.goals_for, c.goals_against, c.goal_difference), (4, 2, 2));
        assert_eq!((c.points, c.goal_average), (4, 2.0));

        let d = row(&rows, "D");
        assert_eq!(
            (d.matches_played, d.wins, d.draws, d.losses),
            (2, 2, 0, 0)
        );
        assert_eq!((d.goals_for, d.goals_against, d.goal_difference), (5, 0, 5));
        assert_eq!((d.points, d.goal_average), (6, 2.5));

        let e = row(&rows, "E");
        assert_eq!(
            (e.matches_played, e.wins, e.draws, e.losses),
            (1, 0, 0, 1)
        );
        assert_eq!((e.goals_for, e.goals_against, e.goal_difference), (0, 1, -1));
        assert_eq!((e.points, e.goal_average), (0, 0.0));
    }

    #[test]
    fn test_player_without_matches_has_zero_row() {
        let rows = compute_standings(&roster(), &[]);
        assert_eq!(rows.len(), 5);
        for r in &rows {
            assert_eq!(r.matches_played, 0);
            assert_eq!(r.points, 0);
            assert_eq!(r.goal_average, 0.0);
        }
    }

    #[test]
    fn test_unscored_and_incomplete_matches_are_ignored() {
        let mut pending = result(1, 1, 1, 2, 0, 0);
        pending.player1_score = None;
        pending.player2_score = None;
        pending.is_completed = false;

        let mut flagged_only = result(2, 1, 1, 3, 5, 0);
        flagged_only.is_completed = false;

        let rows = aggregate_standings(&roster(), &[pending, flagged_only]);
        assert!(rows.iter().all(|r| r.matches_played == 0));
    }

    #[test]
    fn test_goal_average_is_rounded_to_two_decimals() {
        assert_eq!(goal_average(0, 0), 0.0);
        assert_eq!(goal_average(5, 3), 1.67);
        assert_eq!(goal_average(1, 3), 0.33);
        assert_eq!(goal_average(-2, 4), -0.5);
    }

    #[test]
    fn test_ranking_keys_in_order() {
        let mut rows: Vec<StandingRow> = roster().iter().map(StandingRow::empty).collect();
        // A and B tie on points, B has the better goal average.
        rows[0].points = 6;
        rows[0].goal_average = 2.0;
        rows[1].points = 6;
        rows[1].goal_average = 2.5;
        // C and D tie on points and average, D has the better difference.
        rows[2].points = 3;
        rows[2].goal_average = 1.0;
        rows[2].goal_difference = -1;
        rows[3].points = 3;
        rows[3].goal_average = 1.0;
        rows[3].goal_difference = 2;

        rank_standings(&mut rows);
        let names: Vec<&str> = rows.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "D", "C", "E"]);
    }

    #[test]
    fn test_full_ties_keep_aggregation_order() {
        let mut rows: Vec<StandingRow> = roster().iter().map(StandingRow::empty).collect();
        for r in rows.iter_mut() {
            r.points = 3;
            r.goal_average = 1.0;
            r.goal_difference = 0;
        }
        rank_standings(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|r| r.player_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_cumulative_equals_sum_of_weeks() {
        let players = roster();
        let matches = vec![
            result(1, 1, 1, 2, 3, 1),
            result(2, 1, 3, 4, 0, 0),
            result(3, 1, 5, 1, 2, 4),
            result(4, 2, 2, 3, 1, 1),
            result(5, 2, 4, 5, 0, 3),
            result(6, 2, 1, 4, 2, 2),
            result(7, 3, 5, 2, 6, 1),
        ];

        let season = aggregate_standings(&players, &matches);

        let mut summed: Vec<StandingRow> = players.iter().map(StandingRow::empty).collect();
        for week in 1..=3 {
            let week_matches: Vec<Match> = matches
                .iter()
                .filter(|m| m.week_number == week)
                .cloned()
                .collect();
            for (total, weekly) in summed
                .iter_mut()
                .zip(aggregate_standings(&players, &week_matches))
            {
                total.matches_played += weekly.matches_played;
                total.wins += weekly.wins;
                total.draws += weekly.draws;
                total.losses += weekly.losses;
                total.goals_for += weekly.goals_for;
                total.goals_against += weekly.goals_against;
            }
        }
        for total in summed.iter_mut() {
            total.finish();
        }

        assert_eq!(season, summed);
    }

    #[test]
    fn test_extreme_scores_saturate() {
        let matches = vec![
            result(1, 1, 1, 2, i64::MAX, -1),
            result(2, 1, 1, 3, i64::MAX, 0),
            result(3, 1, 4, 5, i64::MIN, i64::MAX),
        ];
        let rows = compute_standings(&roster(), &matches);

        let a = row(&rows, "A");
        assert_eq!(a.wins, 2);
        assert_eq!(a.goals_for, i64::MAX);
        assert_eq!(a.goal_difference, i64::MAX);
        assert_eq!(row(&rows, "B").goal_difference, i64::MIN);
        assert_eq!(row(&rows, "C").goal_difference, i64::MIN + 1);
        assert_eq!(row(&rows, "D").goal_difference, i64::MIN);
        assert_eq!(row(&rows, "E").goal_difference, i64::MAX);
        assert_eq!(rows[0].player_name, "A");
    }
}

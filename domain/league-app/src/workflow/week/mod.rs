use crate::domain::{
    MatchId, PlayerId,
    r#match::Match,
    player::Player,
    standings::StandingRow,
};

pub mod advance;
pub mod generate;
pub mod view;

/// A match with both player names resolved for display.
#[derive(Clone, Debug)]
pub struct MatchView {
    pub id: MatchId,
    pub match_number: u32,
    pub player1_id: PlayerId,
    pub player1_name: String,
    pub player2_id: PlayerId,
    pub player2_name: String,
    pub player1_score: Option<i64>,
    pub player2_score: Option<i64>,
    pub is_completed: bool,
    pub winner_name: Option<String>,
}

impl MatchView {
    pub fn from(m: &Match, players: &[Player]) -> Self {
        let name_of = |id: PlayerId| {
            players
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("#{}", id))
        };
        Self {
            id: m.id,
            match_number: m.match_number,
            player1_id: m.player1_id,
            player1_name: name_of(m.player1_id),
            player2_id: m.player2_id,
            player2_name: name_of(m.player2_id),
            player1_score: m.player1_score,
            player2_score: m.player2_score,
            is_completed: m.is_completed,
            winner_name: m.winner().map(name_of),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WeekView {
    pub week_number: u32,
    pub matches: Vec<MatchView>,
    pub standings: Vec<StandingRow>,
}

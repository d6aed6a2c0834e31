//! Weekly pairings for the active roster.
//!
//! With exactly [`ROSTER_SIZE`] players and [`MATCHES_PER_PLAYER`] matches each,
//! a week holds `5 * 4 / 2 = 10` matches, which is also the number of distinct
//! pairs: every pair meets exactly once per week. The strategies only differ in
//! the order the matches are numbered in.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;

use crate::domain::{MATCHES_PER_PLAYER, PlayerId, ROSTER_SIZE};

/// An unplayed pairing, numbered from 1 within its week.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub match_number: u32,
    pub player1: PlayerId,
    pub player2: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    #[error("exactly {ROSTER_SIZE} active players are required, found {found}")]
    WrongRosterSize { found: usize },
    #[error("player {0} appears twice in the roster")]
    DuplicatePlayer(PlayerId),
}

pub trait PairingStrategy {
    fn pair(&self, players: &[PlayerId]) -> Result<Vec<Fixture>, FixtureError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingKind {
    RandomGreedy,
    Circle,
}

impl PairingKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "random_greedy" => Some(PairingKind::RandomGreedy),
            "circle" => Some(PairingKind::Circle),
            _ => None,
        }
    }

    pub fn strategy(self) -> Arc<dyn PairingStrategy + Send + Sync + 'static> {
        match self {
            PairingKind::RandomGreedy => Arc::new(RandomGreedyPairing),
            PairingKind::Circle => Arc::new(CirclePairing),
        }
    }
}

fn check_roster(players: &[PlayerId]) -> Result<(), FixtureError> {
    if players.len() != ROSTER_SIZE {
        return Err(FixtureError::WrongRosterSize {
            found: players.len(),
        });
    }
    let mut seen = HashSet::new();
    for player in players {
        if !seen.insert(*player) {
            return Err(FixtureError::DuplicatePlayer(*player));
        }
    }
    Ok(())
}

fn number(pairs: Vec<(PlayerId, PlayerId)>) -> Vec<Fixture> {
    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (player1, player2))| Fixture {
            match_number: i as u32 + 1,
            player1,
            player2,
        })
        .collect()
}

/// Shuffles every unordered pair and accepts pairs greedily until each player
/// has [`MATCHES_PER_PLAYER`] matches.
pub struct RandomGreedyPairing;

impl PairingStrategy for RandomGreedyPairing {
    fn pair(&self, players: &[PlayerId]) -> Result<Vec<Fixture>, FixtureError> {
        random_greedy_fixtures(players, &mut rand::rng())
    }
}

pub fn random_greedy_fixtures<R: Rng + ?Sized>(
    players: &[PlayerId],
    rng: &mut R,
) -> Result<Vec<Fixture>, FixtureError> {
    check_roster(players)?;

    let mut pairs = Vec::new();
    for (i, &a) in players.iter().enumerate() {
        for &b in &players[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs.shuffle(rng);

    let target = players.len() * MATCHES_PER_PLAYER / 2;
    let mut scheduled: HashMap<PlayerId, usize> = players.iter().map(|p| (*p, 0)).collect();
    let mut selected = Vec::with_capacity(target);

    for (a, b) in pairs {
        if scheduled[&a] < MATCHES_PER_PLAYER && scheduled[&b] < MATCHES_PER_PLAYER {
            selected.push((a, b));
            *scheduled.entry(a).or_default() += 1;
            *scheduled.entry(b).or_default() += 1;
            if selected.len() == target {
                break;
            }
        }
    }

    Ok(number(selected))
}

/// Circle-method rotation: the first slot stays fixed while the others rotate,
/// with a bye slot padding odd rosters. Deterministic for a given player order.
pub struct CirclePairing;

impl PairingStrategy for CirclePairing {
    fn pair(&self, players: &[PlayerId]) -> Result<Vec<Fixture>, FixtureError> {
        check_roster(players)?;

        let mut slots: Vec<Option<PlayerId>> = players.iter().copied().map(Some).collect();
        if slots.len() % 2 == 1 {
            slots.push(None);
        }
        let n = slots.len();

        let mut pairs = Vec::new();
        for _round in 0..n - 1 {
            for i in 0..n / 2 {
                if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                    pairs.push((a, b));
                }
            }
            slots[1..].rotate_right(1);
        }

        Ok(number(pairs))
    }
}

//! Computer-controlled Warden for single-player Blind Duel
//!
//! Each difficulty tier is its own policy behind [`SeekerPolicy`]. Policies
//! pick the two sub-moves in order: the second is chosen from where the
//! first would leave the warden, not from its pre-turn cell. Only greedy
//! single-step pursuit is used; there is no pathfinding.

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid, Position};
use super::moves::{Move, MovePair};

/// Warden skill tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "e" | "easy" => Some(Difficulty::Easy),
            "m" | "med" | "medium" => Some(Difficulty::Medium),
            "h" | "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// The policy that plays this tier
    pub fn policy(self) -> &'static dyn SeekerPolicy {
        match self {
            Difficulty::Easy => &RandomPolicy,
            Difficulty::Medium => &MixedPolicy,
            Difficulty::Hard => &InterceptPolicy,
        }
    }

    /// Hard wardens ping on every eligible turn
    pub fn auto_pings(self) -> bool {
        self == Difficulty::Hard
    }
}

/// Chooses one committed move-pair per turn for the warden
pub trait SeekerPolicy: Send + Sync {
    fn choose(&self, grid: &Grid, seeker: Position, evader: Position, rng: &mut Pcg32)
    -> MovePair;
}

/// Easy: uniformly random non-wall steps
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

/// Medium: coin flip per sub-step between pursuit and a random step
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedPolicy;

/// Hard: always steps toward the hero
#[derive(Debug, Clone, Copy, Default)]
pub struct InterceptPolicy;

/// Chance a Medium warden pursues on a given sub-step
const MIXED_PURSUIT_CHANCE: f64 = 0.5;

impl SeekerPolicy for RandomPolicy {
    fn choose(&self, grid: &Grid, seeker: Position, _evader: Position, rng: &mut Pcg32) -> MovePair {
        plan(grid, seeker, |_, from| random_valid(grid, from, rng))
    }
}

impl SeekerPolicy for MixedPolicy {
    fn choose(&self, grid: &Grid, seeker: Position, evader: Position, rng: &mut Pcg32) -> MovePair {
        plan(grid, seeker, |_, from| {
            if rng.random_bool(MIXED_PURSUIT_CHANCE) {
                pursue(grid, from, evader, rng)
            } else {
                random_valid(grid, from, rng)
            }
        })
    }
}

impl SeekerPolicy for InterceptPolicy {
    fn choose(&self, grid: &Grid, seeker: Position, evader: Position, rng: &mut Pcg32) -> MovePair {
        plan(grid, seeker, |_, from| pursue(grid, from, evader, rng))
    }
}

/// Pick both sub-moves in order, advancing the hypothetical warden position
/// between them
fn plan(grid: &Grid, start: Position, mut pick: impl FnMut(usize, Position) -> Move) -> MovePair {
    let mut from = start;
    let mut moves = [Move::Wait; 2];
    for (step, slot) in moves.iter_mut().enumerate() {
        *slot = pick(step, from);
        from = grid.try_step(from, slot.delta());
    }
    MovePair(moves)
}

fn is_open(grid: &Grid, from: Position, m: Move) -> bool {
    grid.cell_at(from.offset(m.delta())) != Cell::Wall
}

/// Uniform choice among non-wall directions, or wait when boxed in
pub fn random_valid(grid: &Grid, from: Position, rng: &mut Pcg32) -> Move {
    let open: Vec<Move> = Move::DIRECTIONS
        .into_iter()
        .filter(|m| is_open(grid, from, *m))
        .collect();
    open.choose(rng).copied().unwrap_or(Move::Wait)
}

/// Single Manhattan-reducing step toward `target`, along the axis with the
/// larger gap (rows win ties). `None` when already there.
pub fn greedy_step(from: Position, target: Position) -> Option<Move> {
    let dr = target.row - from.row;
    let dc = target.col - from.col;
    if dr == 0 && dc == 0 {
        return None;
    }
    let m = if dr.abs() >= dc.abs() {
        if dr > 0 { Move::Down } else { Move::Up }
    } else if dc > 0 {
        Move::Right
    } else {
        Move::Left
    };
    Some(m)
}

/// Greedy step if it is open, otherwise any open direction, otherwise wait
fn pursue(grid: &Grid, from: Position, target: Position, rng: &mut Pcg32) -> Move {
    match greedy_step(from, target) {
        Some(m) if is_open(grid, from, m) => m,
        _ => random_valid(grid, from, rng),
    }
}

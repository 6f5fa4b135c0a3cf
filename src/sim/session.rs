//! Blind Duel level session
//!
//! Owns the live grid for one level plus the per-level turn and ping state.
//! Health, shield and gold belong to [`RunStatus`] and outlive the level.

use serde::{Deserialize, Serialize};

use super::duel::{DuelState, Resolution, resolve_pass};
use super::grid::{Cell, Grid, LevelError, Position};
use super::moves::MovePair;
use crate::consts::*;

/// State carried from level to level within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub health: u8,
    /// Mirror Shield unused; once false it stays false for the run
    pub shield_available: bool,
    pub gold: u32,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self {
            health: START_HEALTH,
            shield_available: true,
            gold: 0,
        }
    }
}

/// Where a level stands at the top of an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    InProgress,
    Won,
    Lost,
}

/// Warden's periodic reveal of the hero's surroundings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ping {
    cooldown: u8,
    visible: bool,
}

impl Ping {
    /// Every `PING_PERIOD`th turn (never turn 0), once the cooldown is spent
    pub fn eligible(&self, turn: u32) -> bool {
        turn > 0 && turn % PING_PERIOD == 0 && self.cooldown == 0
    }

    pub fn activate(&mut self) {
        self.cooldown = PING_COOLDOWN;
        self.visible = true;
    }

    /// End-of-turn bookkeeping
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown < PING_VISIBLE_MIN_COOLDOWN {
            self.visible = false;
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn cooldown(&self) -> u8 {
        self.cooldown
    }
}

/// Pickup collected by the hero at the end of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pickup {
    Health,
    Gold,
}

/// What one committed turn did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub resolution: Resolution,
    pub pickup: Option<Pickup>,
}

/// One Blind Duel level in play
#[derive(Debug, Clone)]
pub struct DuelLevel {
    grid: Grid,
    goal: Position,
    evader: Position,
    seeker: Position,
    seeker_stunned: bool,
    turn: u32,
    ping: Ping,
}

impl DuelLevel {
    /// Parse a template into a fresh grid, lift the hero and warden markers
    /// off it (their cells become floor) and locate the goal. A template
    /// without a goal gets one at (height-2, width-2).
    pub fn load(template: &[&str]) -> Result<Self, LevelError> {
        let mut grid = Grid::parse(template)?;
        let evader = grid.find_unique(Cell::Evader)?;
        let seeker = grid.find_unique(Cell::Seeker)?;
        grid.set_cell(evader, Cell::Floor);
        grid.set_cell(seeker, Cell::Floor);

        let goal = grid.find_all(Cell::Goal).first().copied().unwrap_or_else(|| {
            Position::new(grid.height() as i32 - 2, grid.width() as i32 - 2)
        });

        log::info!(
            "Duel level loaded: {}x{}, hero {:?}, warden {:?}, goal {:?}",
            grid.width(),
            grid.height(),
            evader,
            seeker,
            goal
        );

        Ok(Self {
            grid,
            goal,
            evader,
            seeker,
            seeker_stunned: false,
            turn: 0,
            ping: Ping::default(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn evader(&self) -> Position {
        self.evader
    }

    pub fn seeker(&self) -> Position {
        self.seeker
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn seeker_stunned(&self) -> bool {
        self.seeker_stunned
    }

    pub fn ping(&self) -> Ping {
        self.ping
    }

    /// Goal is checked before health, so reaching it on the last hit point
    /// still wins.
    pub fn status(&self, run: &RunStatus) -> LevelStatus {
        if self.evader == self.goal {
            LevelStatus::Won
        } else if run.health == 0 {
            LevelStatus::Lost
        } else {
            LevelStatus::InProgress
        }
    }

    pub fn ping_eligible(&self) -> bool {
        self.ping.eligible(self.turn)
    }

    /// Reveal the hero; ignored unless the ping is currently eligible
    pub fn activate_ping(&mut self) -> bool {
        if !self.ping_eligible() {
            return false;
        }
        log::info!("Warden pings on turn {}", self.turn);
        self.ping.activate();
        true
    }

    /// Resolve both committed move-pairs, fold the result into the run,
    /// collect any pickup under the hero and advance the turn.
    pub fn play_turn(
        &mut self,
        run: &mut RunStatus,
        evader_moves: MovePair,
        seeker_moves: MovePair,
    ) -> TurnReport {
        let state = DuelState {
            evader: self.evader,
            seeker: self.seeker,
            evader_health: run.health,
            shield_available: run.shield_available,
            seeker_stunned: self.seeker_stunned,
        };
        let resolution = resolve_pass(&self.grid, &state, evader_moves, seeker_moves);

        self.evader = resolution.evader;
        self.seeker = resolution.seeker;
        self.seeker_stunned = resolution.seeker_stunned_next;
        run.health = resolution.evader_health;
        if resolution.shield_consumed {
            log::info!("Mirror Shield consumed on turn {}", self.turn);
            run.shield_available = false;
        }

        let pickup = match self.grid.cell_at(self.evader) {
            Cell::Health => {
                run.health = run.health.saturating_add(1).min(MAX_HEALTH);
                Some(Pickup::Health)
            }
            Cell::Gold => {
                run.gold += 1;
                Some(Pickup::Gold)
            }
            _ => None,
        };
        if pickup.is_some() {
            self.grid.set_cell(self.evader, Cell::Floor);
        }

        self.turn += 1;
        self.ping.tick();

        log::debug!(
            "turn {} -> {}: hero {:?} warden {:?} hp {}",
            self.turn,
            resolution.outcome.description(),
            self.evader,
            self.seeker,
            run.health
        );

        TurnReport { resolution, pickup }
    }
}

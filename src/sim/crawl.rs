//! Classic and Tron crawl levels
//!
//! Single-agent dungeon: the player and enemies live in the grid cells
//! themselves. Each player step is followed by one enemy phase. Enemies run
//! a biased random walk, never a path search.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid, LevelError, Position};
use super::moves::Move;
use super::session::LevelStatus;
use crate::consts::*;

/// Chance a Classic enemy tries to close in rather than wander
const ENEMY_PURSUIT_CHANCE: f64 = 0.5;

/// Crawl rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CrawlMode {
    #[default]
    Classic,
    /// Everyone leaves a lethal light trail
    Tron,
}

impl CrawlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlMode::Classic => "Classic",
            CrawlMode::Tron => "Tron",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(CrawlMode::Classic),
            "tron" => Some(CrawlMode::Tron),
            _ => None,
        }
    }

    fn is_tron(self) -> bool {
        self == CrawlMode::Tron
    }
}

/// Run totals carried from level to level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub health: u8,
    pub kills: u32,
    pub gold: u32,
    pub turns: u32,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            health: START_HEALTH,
            kills: 0,
            gold: 0,
            turns: 0,
        }
    }
}

/// Result of one player step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No direction given
    Idle,
    /// Classic wall bump; no turn passes
    Blocked,
    /// Tron: ran into a wall or trail. Health drops to zero.
    Crashed { into: Cell },
    /// The player moved. `entered` is what occupied the target cell
    /// (an enemy cell means a kill); `enemy_hits` is damage from the enemy
    /// phase that followed.
    Moved { entered: Cell, enemy_hits: u8 },
}

/// One Classic or Tron level in play
#[derive(Debug, Clone)]
pub struct CrawlLevel {
    mode: CrawlMode,
    grid: Grid,
    player: Position,
    goal: Position,
    enemies: Vec<Position>,
}

impl CrawlLevel {
    pub fn load(template: &[&str], mode: CrawlMode) -> Result<Self, LevelError> {
        let grid = Grid::parse(template)?;
        let player = grid.find_unique(Cell::Evader)?;
        let goal = grid.find_all(Cell::Goal).first().copied().unwrap_or_else(|| {
            Position::new(grid.height() as i32 - 2, grid.width() as i32 - 2)
        });
        let enemies = grid.find_all(Cell::Seeker);

        log::info!(
            "{} level loaded: {}x{}, player {:?}, goal {:?}, {} enemies",
            mode.as_str(),
            grid.width(),
            grid.height(),
            player,
            goal,
            enemies.len()
        );

        Ok(Self {
            mode,
            grid,
            player,
            goal,
            enemies,
        })
    }

    pub fn mode(&self) -> CrawlMode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn enemies(&self) -> &[Position] {
        &self.enemies
    }

    pub fn status(&self, stats: &CrawlStats) -> LevelStatus {
        if self.player == self.goal {
            LevelStatus::Won
        } else if stats.health == 0 {
            LevelStatus::Lost
        } else {
            LevelStatus::InProgress
        }
    }

    /// What a vacated cell turns into
    fn vacated(&self, pos: Position) -> Cell {
        if self.mode.is_tron() {
            Cell::Trail
        } else if pos == self.goal {
            Cell::Goal
        } else {
            Cell::Floor
        }
    }

    /// Move the player one cell, then let the enemies act
    pub fn step(&mut self, stats: &mut CrawlStats, dir: Move, rng: &mut Pcg32) -> StepOutcome {
        if dir.is_wait() {
            return StepOutcome::Idle;
        }

        let target = self.player.offset(dir.delta());
        let entered = self.grid.cell_at(target);

        match entered {
            Cell::Wall | Cell::Trail if self.mode.is_tron() => {
                log::info!("Player crashed into {entered:?} at {target:?}");
                stats.health = 0;
                return StepOutcome::Crashed { into: entered };
            }
            Cell::Wall => return StepOutcome::Blocked,
            _ => {}
        }

        let vacated = self.vacated(self.player);
        self.grid.set_cell(self.player, vacated);

        match entered {
            Cell::Seeker => {
                self.enemies.retain(|e| *e != target);
                stats.kills += 1;
                stats.health = stats.health.saturating_sub(1);
            }
            Cell::Health => {
                stats.health = stats.health.saturating_add(1).min(MAX_HEALTH);
            }
            Cell::Gold => stats.gold += 1,
            _ => {}
        }

        self.player = target;
        self.grid.set_cell(target, Cell::Evader);
        stats.turns += 1;

        let enemy_hits = self.move_enemies(rng);
        stats.health = stats.health.saturating_sub(enemy_hits);

        StepOutcome::Moved {
            entered,
            enemy_hits,
        }
    }

    /// One enemy phase; returns damage dealt to the player
    fn move_enemies(&mut self, rng: &mut Pcg32) -> u8 {
        let mut damage = 0u8;
        let mut crashed = Vec::new();

        for i in 0..self.enemies.len() {
            let from = self.enemies[i];
            let candidates = self.enemy_candidates(from, rng);

            for dir in candidates {
                let to = from.offset(dir.delta());
                match self.grid.cell_at(to) {
                    Cell::Evader => {
                        damage = damage.saturating_add(1);
                        break;
                    }
                    cell if cell.is_walkable() => {
                        let left = self.vacated(from);
                        self.grid.set_cell(from, left);
                        self.grid.set_cell(to, Cell::Seeker);
                        self.enemies[i] = to;
                        break;
                    }
                    Cell::Wall | Cell::Trail if self.mode.is_tron() => {
                        self.grid.set_cell(from, Cell::Trail);
                        crashed.push(i);
                        break;
                    }
                    _ => {}
                }
            }
        }

        if !crashed.is_empty() {
            log::debug!("{} enemies crashed", crashed.len());
            for i in crashed.into_iter().rev() {
                self.enemies.remove(i);
            }
        }
        damage
    }

    /// Directions an enemy tries, in order
    fn enemy_candidates(&self, from: Position, rng: &mut Pcg32) -> Vec<Move> {
        if !self.mode.is_tron() && rng.random_bool(ENEMY_PURSUIT_CHANCE) {
            let mut toward = Vec::with_capacity(2);
            if self.player.row != from.row {
                toward.push(if self.player.row > from.row {
                    Move::Down
                } else {
                    Move::Up
                });
            }
            if self.player.col != from.col {
                toward.push(if self.player.col > from.col {
                    Move::Right
                } else {
                    Move::Left
                });
            }
            toward.shuffle(rng);
            return toward;
        }

        let mut dirs = Move::DIRECTIONS.to_vec();
        dirs.shuffle(rng);
        dirs
    }
}

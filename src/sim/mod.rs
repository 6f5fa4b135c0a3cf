//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must stay pure and
//! deterministic:
//! - Seeded RNG only, always passed in by the caller
//! - Stable iteration order (row-major grid scans)
//! - No rendering, input or platform dependencies

pub mod ai;
pub mod crawl;
pub mod duel;
pub mod grid;
pub mod levels;
pub mod moves;
pub mod session;

pub use ai::{Difficulty, InterceptPolicy, MixedPolicy, RandomPolicy, SeekerPolicy};
pub use crawl::{CrawlLevel, CrawlMode, CrawlStats, StepOutcome};
pub use duel::{DuelState, Outcome, Resolution, resolve_pass};
pub use grid::{Cell, Grid, LevelError, Position};
pub use levels::{CRAWL_LEVELS, DUEL_LEVELS, LevelTemplate};
pub use moves::{Move, MovePair};
pub use session::{DuelLevel, LevelStatus, Pickup, Ping, RunStatus, TurnReport};

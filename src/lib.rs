//! Dungeon Duel - a terminal grid game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, duel resolution, warden AI, crawl rules)
//! - `game`: Run driver that sequences levels through the ports
//! - `ports`: Input, presentation and notification contracts
//! - `renderer`: Colored terminal frames
//! - `platform`: Terminal input (line prompts, single keys, menus)
//! - `audio`: Synthesised square-wave sound effects
//! - `highscores`: Best-run record
//! - `settings`: Persisted player preferences

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod ports;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, Opponent, PlayMode, RunEnd};
pub use highscores::{BestRun, BestRunStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Health cap
    pub const MAX_HEALTH: u8 = 5;
    /// Health at the start of every run (one below the cap)
    pub const START_HEALTH: u8 = 4;

    /// Ping becomes eligible on every Nth turn
    pub const PING_PERIOD: u32 = 3;
    /// Turns before the warden may ping again
    pub const PING_COOLDOWN: u8 = 3;
    /// Reveal stays on screen while the cooldown is at least this
    pub const PING_VISIBLE_MIN_COOLDOWN: u8 = 2;
    /// Chebyshev radius of the revealed area (3x3)
    pub const PING_RADIUS: i32 = 1;
}

//! Collaborator contracts between the run driver and the outside world
//!
//! The driver only talks to these traits, so the terminal front end, the
//! audio player and the scripted fakes used in tests are interchangeable.

use crate::sim::{Grid, Move, MovePair, Position};

/// Which side of a duel is being asked for input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Evader,
    Seeker,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Evader => "Hero",
            Role::Seeker => "Warden",
        }
    }
}

/// Discrete game events for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    Move,
    WallBump,
    Crash,
    EnemyKill,
    Health,
    Gold,
    Hurt,
    Tag,
    Clash,
    ShieldBlock,
    GoalReached,
    LevelClear,
    GameOver,
    Victory,
}

impl GameEvent {
    /// Stable lowercase tag
    pub fn tag(self) -> &'static str {
        match self {
            GameEvent::Move => "move",
            GameEvent::WallBump => "wall-bump",
            GameEvent::Crash => "crash",
            GameEvent::EnemyKill => "enemy-kill",
            GameEvent::Health => "health",
            GameEvent::Gold => "gold",
            GameEvent::Hurt => "hurt",
            GameEvent::Tag => "tag",
            GameEvent::Clash => "clash",
            GameEvent::ShieldBlock => "shield-block",
            GameEvent::GoalReached => "goal-reached",
            GameEvent::LevelClear => "level-clear",
            GameEvent::GameOver => "game-over",
            GameEvent::Victory => "victory",
        }
    }
}

/// One key press in a crawl level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
    Step(Move),
    ToggleMute,
    Quit,
    /// Unmapped key; the frame is simply redrawn
    Ignored,
}

/// Supplies player decisions. Calls block until the player answers.
pub trait InputProvider {
    /// A committed move-pair for `role`, or `None` when the player quits
    fn move_pair(&mut self, role: Role) -> Option<MovePair>;

    /// Whether a human warden spends an eligible ping
    fn ping_decision(&mut self) -> bool;

    /// Next single-key command in Classic/Tron
    fn step_command(&mut self) -> StepCommand;

    /// Wait for the player to acknowledge `prompt` (e.g. "press Enter")
    fn acknowledge(&mut self, prompt: &str);
}

/// Transient status flags shown under the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub shield_ready: bool,
    pub seeker_stunned: bool,
    pub ping_visible: bool,
}

/// Crawl-only run totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlHud {
    pub kills: u32,
    pub gold: u32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub header: &'a str,
    pub grid: &'a Grid,
    /// Agents drawn over the grid. Crawl agents already live in the cells
    /// and leave these empty.
    pub evader: Option<Position>,
    pub seeker: Option<Position>,
    /// Glyph for seeker cells (`W` warden, `E` crawl enemy)
    pub seeker_glyph: char,
    pub health: u8,
    pub max_health: u8,
    pub turn: u32,
    pub crawl: Option<CrawlHud>,
    pub flags: Flags,
    pub message: &'a str,
    pub help: &'a str,
}

/// Renders frames and full-screen announcements. Purely observational.
pub trait PresentationSink {
    fn present(&mut self, frame: &Frame<'_>);

    /// Level-clear banners, run summaries and the like
    fn announce(&mut self, title: &str, lines: &[String]);
}

/// Fire-and-forget feedback. Implementations must never block or fail.
pub trait NotificationSink {
    fn notify(&mut self, event: GameEvent);

    /// Audio preference; events are dropped while muted
    fn set_muted(&mut self, _muted: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_event_tags_are_unique_lowercase() {
        let all = [
            GameEvent::Move,
            GameEvent::WallBump,
            GameEvent::Crash,
            GameEvent::EnemyKill,
            GameEvent::Health,
            GameEvent::Gold,
            GameEvent::Hurt,
            GameEvent::Tag,
            GameEvent::Clash,
            GameEvent::ShieldBlock,
            GameEvent::GoalReached,
            GameEvent::LevelClear,
            GameEvent::GameOver,
            GameEvent::Victory,
        ];
        let tags: HashSet<&str> = all.iter().map(|e| e.tag()).collect();
        assert_eq!(tags.len(), all.len());
        for tag in tags {
            assert_eq!(tag, tag.to_lowercase());
        }
    }
}

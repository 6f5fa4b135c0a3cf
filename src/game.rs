//! Run driver
//!
//! Sequences the fixed levels of a mode, collects decisions through the
//! [`InputProvider`], feeds them to the simulation and reports frames and
//! events to the sinks. Health and shield (duel) or health, kills, gold and
//! turns (crawl) carry across levels; everything else is rebuilt per level.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::MAX_HEALTH;
use crate::highscores::{BestRun, BestRunStore, RecordUpdate};
use crate::ports::{
    CrawlHud, Flags, Frame, GameEvent, InputProvider, NotificationSink, PresentationSink, Role,
    StepCommand,
};
use crate::sim::{
    CRAWL_LEVELS, Cell, CrawlLevel, CrawlMode, CrawlStats, DUEL_LEVELS, Difficulty, DuelLevel,
    LevelError, LevelStatus, LevelTemplate, Outcome, Pickup, RunStatus, StepOutcome, TurnReport,
};

const CRAWL_HELP: &str = "Move: arrows or w/a/s/d   Mute: m   Quit: q";
const DUEL_HELP: &str = "Both lock in 2 moves: R/L/U/D/W (or words). q quits.";
const REVEAL_PROMPT: &str = "Press Enter to REVEAL...";
const NEXT_LEVEL_PROMPT: &str = "Press Enter for next level...";

/// Top-level mode choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Crawl(CrawlMode),
    Duel,
}

impl PlayMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "duel" | "blind-duel" => Some(PlayMode::Duel),
            other => CrawlMode::from_str(other).map(PlayMode::Crawl),
        }
    }
}

/// Who plays the warden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Second player on the same keyboard
    Human,
    Computer(Difficulty),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    Victory,
    Defeat,
    Quit,
}

/// Final Blind Duel report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelSummary {
    pub end: RunEnd,
    /// 1-based level reached
    pub level: usize,
    pub health: u8,
    pub shield_used: bool,
    pub gold: u32,
}

/// Final Classic/Tron report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub end: RunEnd,
    pub level: usize,
    pub stats: CrawlStats,
    pub record: RecordUpdate,
}

enum LevelEnd {
    Won,
    Lost,
    Quit,
}

/// Drives whole runs over a set of ports
pub struct Game<I, P, N> {
    input: I,
    view: P,
    sound: N,
    rng: Pcg32,
    muted: bool,
}

impl<I, P, N> Game<I, P, N>
where
    I: InputProvider,
    P: PresentationSink,
    N: NotificationSink,
{
    /// All randomness in the run is drawn from `seed`
    pub fn new(input: I, view: P, mut sound: N, seed: u64, muted: bool) -> Self {
        log::info!("Run seed: {seed}");
        sound.set_muted(muted);
        Self {
            input,
            view,
            sound,
            rng: Pcg32::seed_from_u64(seed),
            muted,
        }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn notify(&mut self, event: GameEvent) {
        log::debug!("event: {}", event.tag());
        self.sound.notify(event);
    }

    fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.sound.set_muted(self.muted);
        log::info!("Sound {}", if self.muted { "muted" } else { "on" });
    }

    // === Blind Duel ===

    pub fn run_duel(&mut self, opponent: Opponent) -> Result<DuelSummary, LevelError> {
        self.run_duel_levels(&DUEL_LEVELS, opponent)
    }

    pub fn run_duel_levels(
        &mut self,
        levels: &[LevelTemplate],
        opponent: Opponent,
    ) -> Result<DuelSummary, LevelError> {
        log::info!("Blind Duel run vs {opponent:?}");
        let mut run = RunStatus::default();
        let total = levels.len();

        for (index, template) in levels.iter().enumerate() {
            let number = index + 1;
            let mut level = DuelLevel::load(template)?;
            match self.play_duel_level(number, total, &mut level, &mut run, opponent) {
                LevelEnd::Won if number < total => {
                    self.notify(GameEvent::LevelClear);
                    self.view.announce(
                        &format!("LEVEL {number} CLEAR"),
                        &[format!("Hero HP: {}/{}", run.health, MAX_HEALTH)],
                    );
                    self.input.acknowledge(NEXT_LEVEL_PROMPT);
                }
                LevelEnd::Won => {}
                LevelEnd::Lost => {
                    self.notify(GameEvent::GameOver);
                    return Ok(self.finish_duel(RunEnd::Defeat, number, &run));
                }
                LevelEnd::Quit => return Ok(self.finish_duel(RunEnd::Quit, number, &run)),
            }
        }

        self.notify(GameEvent::Victory);
        Ok(self.finish_duel(RunEnd::Victory, total, &run))
    }

    fn present_duel(&mut self, header: &str, level: &DuelLevel, run: &RunStatus, message: &str) {
        self.view.present(&Frame {
            header,
            grid: level.grid(),
            evader: Some(level.evader()),
            seeker: Some(level.seeker()),
            seeker_glyph: 'W',
            health: run.health,
            max_health: MAX_HEALTH,
            turn: level.turn(),
            crawl: None,
            flags: Flags {
                shield_ready: run.shield_available,
                seeker_stunned: level.seeker_stunned(),
                ping_visible: level.ping().visible(),
            },
            message,
            help: DUEL_HELP,
        });
    }

    fn play_duel_level(
        &mut self,
        number: usize,
        total: usize,
        level: &mut DuelLevel,
        run: &mut RunStatus,
        opponent: Opponent,
    ) -> LevelEnd {
        let header = format!("BLIND DUEL - Level {number}/{total}   Hero (@) vs Warden (W)");
        let mut message = String::new();

        loop {
            self.present_duel(&header, level, run, &message);

            match level.status(run) {
                LevelStatus::Won => {
                    self.notify(GameEvent::GoalReached);
                    return LevelEnd::Won;
                }
                LevelStatus::Lost => return LevelEnd::Lost,
                LevelStatus::InProgress => {}
            }

            if level.ping_eligible() {
                let wants_ping = match opponent {
                    Opponent::Human => self.input.ping_decision(),
                    Opponent::Computer(difficulty) => difficulty.auto_pings(),
                };
                if wants_ping && level.activate_ping() {
                    message = "PING! Hero revealed in 3x3.".to_string();
                    self.present_duel(&header, level, run, &message);
                }
            }

            let Some(evader_moves) = self.input.move_pair(Role::Evader) else {
                return LevelEnd::Quit;
            };
            let (seeker_moves, prompt) = match opponent {
                Opponent::Human => {
                    let Some(moves) = self.input.move_pair(Role::Seeker) else {
                        return LevelEnd::Quit;
                    };
                    (moves, REVEAL_PROMPT.to_string())
                }
                Opponent::Computer(difficulty) => {
                    let moves = difficulty.policy().choose(
                        level.grid(),
                        level.seeker(),
                        level.evader(),
                        &mut self.rng,
                    );
                    (moves, format!("Warden (AI) chose: {}. {REVEAL_PROMPT}", moves.code()))
                }
            };
            self.input.acknowledge(&prompt);

            let report = level.play_turn(run, evader_moves, seeker_moves);
            message = self.describe_turn(&report, run);
        }
    }

    fn describe_turn(&mut self, report: &TurnReport, run: &RunStatus) -> String {
        let outcome = report.resolution.outcome;
        let event = match outcome {
            Outcome::NoContact => GameEvent::Move,
            Outcome::Clash => GameEvent::Clash,
            o if o.is_tag() => GameEvent::Tag,
            _ => GameEvent::ShieldBlock,
        };
        self.notify(event);

        let mut message = outcome.description().to_string();
        match report.pickup {
            Some(Pickup::Health) => {
                self.notify(GameEvent::Health);
                message.push_str(&format!(" | Health +1 (now {}/{})", run.health, MAX_HEALTH));
            }
            Some(Pickup::Gold) => {
                self.notify(GameEvent::Gold);
                message.push_str(&format!(" | Gold +1 (total {})", run.gold));
            }
            None => {}
        }
        message
    }

    fn finish_duel(&mut self, end: RunEnd, level: usize, run: &RunStatus) -> DuelSummary {
        let title = match end {
            RunEnd::Victory => "HERO WINS!",
            RunEnd::Defeat => "WARDEN WINS - HERO FELL",
            RunEnd::Quit => "QUIT",
        };
        let mut lines = Vec::new();
        if end == RunEnd::Victory {
            lines.push("All levels cleared. You out-predicted the Warden.".to_string());
        }
        lines.push(format!("Reached level {level}"));
        lines.push(format!("Hero HP: {}/{}   Gold: {}", run.health, MAX_HEALTH, run.gold));
        lines.push(format!(
            "Mirror Shield: {}",
            if run.shield_available { "unused" } else { "used" }
        ));
        self.view.announce(title, &lines);

        DuelSummary {
            end,
            level,
            health: run.health,
            shield_used: !run.shield_available,
            gold: run.gold,
        }
    }

    // === Classic / Tron ===

    pub fn run_crawl(
        &mut self,
        mode: CrawlMode,
        store: &BestRunStore,
    ) -> Result<CrawlSummary, LevelError> {
        self.run_crawl_levels(&CRAWL_LEVELS, mode, store)
    }

    pub fn run_crawl_levels(
        &mut self,
        levels: &[LevelTemplate],
        mode: CrawlMode,
        store: &BestRunStore,
    ) -> Result<CrawlSummary, LevelError> {
        log::info!("{} run", mode.as_str());
        let mut stats = CrawlStats::default();
        let total = levels.len();

        for (index, template) in levels.iter().enumerate() {
            let number = index + 1;
            let mut level = CrawlLevel::load(template, mode)?;
            match self.play_crawl_level(number, total, &mut level, &mut stats) {
                LevelEnd::Won if number < total => {
                    self.notify(GameEvent::LevelClear);
                    self.view.announce(
                        &format!("LEVEL {number} CLEAR"),
                        &[format!(
                            "HP: {}/{}   Kills: {}   Gold: {}",
                            stats.health, MAX_HEALTH, stats.kills, stats.gold
                        )],
                    );
                    self.input.acknowledge(NEXT_LEVEL_PROMPT);
                }
                LevelEnd::Won => {}
                LevelEnd::Lost => {
                    self.notify(GameEvent::GameOver);
                    return Ok(self.finish_crawl(RunEnd::Defeat, number, stats, store));
                }
                LevelEnd::Quit => return Ok(self.finish_crawl(RunEnd::Quit, number, stats, store)),
            }
        }

        self.notify(GameEvent::Victory);
        Ok(self.finish_crawl(RunEnd::Victory, total, stats, store))
    }

    fn play_crawl_level(
        &mut self,
        number: usize,
        total: usize,
        level: &mut CrawlLevel,
        stats: &mut CrawlStats,
    ) -> LevelEnd {
        let header = match level.mode() {
            CrawlMode::Classic => format!("CLASSIC   LEVEL {number}/{total}   Reach the G!"),
            CrawlMode::Tron => {
                format!("TRON MODE   LEVEL {number}/{total}   = trail (don't touch!)   Reach G!")
            }
        };
        let mut message = String::new();

        loop {
            self.view.present(&Frame {
                header: &header,
                grid: level.grid(),
                evader: None,
                seeker: None,
                seeker_glyph: 'E',
                health: stats.health,
                max_health: MAX_HEALTH,
                turn: stats.turns,
                crawl: Some(CrawlHud {
                    kills: stats.kills,
                    gold: stats.gold,
                }),
                flags: Flags::default(),
                message: &message,
                help: CRAWL_HELP,
            });

            match level.status(stats) {
                LevelStatus::Won => {
                    self.notify(GameEvent::GoalReached);
                    return LevelEnd::Won;
                }
                LevelStatus::Lost => return LevelEnd::Lost,
                LevelStatus::InProgress => {}
            }

            match self.input.step_command() {
                StepCommand::Quit => return LevelEnd::Quit,
                StepCommand::ToggleMute => {
                    self.toggle_mute();
                    message = if self.muted { "Sound muted." } else { "Sound on." }.to_string();
                }
                StepCommand::Ignored => {}
                StepCommand::Step(dir) => {
                    let outcome = level.step(stats, dir, &mut self.rng);
                    if let Some(text) = self.describe_step(outcome, level.mode(), stats) {
                        message = text;
                    }
                }
            }
        }
    }

    /// Events for a step plus the new status line (`None` keeps the old one)
    fn describe_step(
        &mut self,
        outcome: StepOutcome,
        mode: CrawlMode,
        stats: &CrawlStats,
    ) -> Option<String> {
        let text = match outcome {
            StepOutcome::Idle => return None,
            StepOutcome::Blocked => {
                self.notify(GameEvent::WallBump);
                "Blocked by wall.".to_string()
            }
            StepOutcome::Crashed { into } => {
                self.notify(GameEvent::Crash);
                if into == Cell::Trail {
                    "CRASH! Hit trail.".to_string()
                } else {
                    "CRASH! Hit wall.".to_string()
                }
            }
            StepOutcome::Moved {
                entered,
                enemy_hits,
            } => {
                let (event, mut text) = match entered {
                    Cell::Seeker => (
                        GameEvent::EnemyKill,
                        "You killed an enemy! (-1 HP)".to_string(),
                    ),
                    Cell::Health => (
                        GameEvent::Health,
                        format!("Health +1 (now {}/{})", stats.health, MAX_HEALTH),
                    ),
                    Cell::Gold => (GameEvent::Gold, format!("Gold +1 (total {})", stats.gold)),
                    _ => (GameEvent::Move, String::new()),
                };
                self.notify(event);

                if enemy_hits > 0 {
                    self.notify(GameEvent::Hurt);
                    text = format!("Enemy hit you! (-{enemy_hits} HP)");
                } else if text.is_empty() {
                    text = match mode {
                        CrawlMode::Classic => "Moved.",
                        CrawlMode::Tron => "Moved. Trail left behind.",
                    }
                    .to_string();
                }
                text
            }
        };
        Some(text)
    }

    fn finish_crawl(
        &mut self,
        end: RunEnd,
        level: usize,
        stats: CrawlStats,
        store: &BestRunStore,
    ) -> CrawlSummary {
        let title = match end {
            RunEnd::Victory => "YOU WON!",
            RunEnd::Defeat => "GAME OVER - YOU DIED",
            RunEnd::Quit => "QUIT",
        };
        let mut lines = vec![format!(
            "Level {level}   Kills: {}   Gold: {}   Turns: {}",
            stats.kills, stats.gold, stats.turns
        )];

        let record = store.record(BestRun::new(stats.gold, stats.turns));
        match record {
            RecordUpdate::FirstRun => lines.push("First run saved as best.".to_string()),
            RecordUpdate::NewBest { previous } => {
                lines.push(format!(
                    "Best run: {} gold, {} turns",
                    previous.gold, previous.turns
                ));
                lines.push("New best! Record saved.".to_string());
            }
            RecordUpdate::NotBetter { best } => {
                lines.push(format!("Best run: {} gold, {} turns", best.gold, best.turns));
            }
        }
        self.view.announce(title, &lines);

        CrawlSummary {
            end,
            level,
            stats,
            record,
        }
    }
}

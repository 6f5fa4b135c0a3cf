//! Dungeon Duel entry point
//!
//! Parses the command line, merges it over the saved settings and runs one
//! game in the terminal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dungeon_duel::audio::AudioManager;
use dungeon_duel::platform::TerminalInput;
use dungeon_duel::ports::InputProvider;
use dungeon_duel::renderer::TerminalRenderer;
use dungeon_duel::settings::DEFAULT_SETTINGS_FILE;
use dungeon_duel::sim::Difficulty;
use dungeon_duel::{BestRunStore, Game, Opponent, PlayMode, Settings};

#[derive(Parser)]
#[command(name = "dungeon-duel", version, about = "Terminal dungeon crawler with a simultaneous-move duel")]
struct Cli {
    /// Start a mode directly: classic, tron or duel (menu when omitted)
    #[arg(long, value_parser = parse_mode)]
    mode: Option<PlayMode>,

    /// Who plays the Blind Duel warden
    #[arg(long, value_parser = ["human", "computer"])]
    opponent: Option<String>,

    /// Computer warden difficulty: easy, medium or hard
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Start with sound effects off
    #[arg(long)]
    mute: bool,

    /// Settings file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Best-run record file for Classic and Tron
    #[arg(long, value_name = "PATH")]
    best_run: Option<PathBuf>,
}

fn parse_mode(s: &str) -> Result<PlayMode, String> {
    PlayMode::from_str(s).ok_or_else(|| format!("unknown mode '{s}' (classic, tron, duel)"))
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}' (easy, medium, hard)"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let saved = Settings::load(&cli.settings);
    let mut config = saved.clone();
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if cli.mute {
        config.muted = true;
    }
    if let Some(path) = cli.best_run.clone() {
        config.best_run_path = path;
    }

    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    log::info!("Dungeon Duel starting (seed {seed})");

    let mut input = TerminalInput::stdio();
    let mode = match cli.mode {
        Some(mode) => mode,
        None => match input.choose_mode().context("Failed to read mode choice")? {
            Some(mode) => mode,
            None => return Ok(()),
        },
    };

    let opponent = match (mode, cli.opponent.as_deref()) {
        (PlayMode::Crawl(_), _) | (PlayMode::Duel, Some("human")) => Opponent::Human,
        (PlayMode::Duel, Some(_)) => Opponent::Computer(config.difficulty),
        (PlayMode::Duel, None) => {
            match input.choose_opponent().context("Failed to read opponent choice")? {
                Some(opponent) => opponent,
                None => return Ok(()),
            }
        }
    };
    input.acknowledge("Press Enter to start...");

    let store = BestRunStore::new(config.best_run_path.clone());
    let mut game = Game::new(
        input,
        TerminalRenderer::stdout(),
        AudioManager::new(),
        seed,
        config.muted,
    );

    match mode {
        PlayMode::Duel => {
            let summary = game.run_duel(opponent).context("Blind Duel level is invalid")?;
            log::info!("Blind Duel finished: {summary:?}");
        }
        PlayMode::Crawl(crawl) => {
            let summary = game
                .run_crawl(crawl, &store)
                .with_context(|| format!("{} level is invalid", crawl.as_str()))?;
            log::info!("{} finished: {summary:?}", crawl.as_str());
        }
    }

    // Only an in-game mute toggle is remembered; CLI overrides are per run
    if game.muted() != config.muted {
        let mut saved = saved;
        saved.muted = game.muted();
        saved.save(&cli.settings);
    }
    Ok(())
}

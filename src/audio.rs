//! Audio system using procedurally synthesised square waves
//!
//! Every effect is an 8-bit mono PCM WAV built in memory, written once to a
//! cache directory and handed to the platform player (`afplay` on macOS,
//! `aplay` elsewhere). Playback is detached and every failure is ignored.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::ports::{GameEvent, NotificationSink};

/// Output sample rate (Hz)
pub const SAMPLE_RATE: u32 = 22050;

/// Size of the canonical PCM WAV header
pub const WAV_HEADER_LEN: usize = 44;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Plain step
    Move,
    /// Bumped a wall, or a shield absorbed a hit
    Wall,
    /// Tron crash or duel clash
    Crash,
    /// Enemy killed
    Kill,
    /// Health pickup
    Health,
    /// Gold pickup
    Gold,
    /// Took damage
    Hurt,
    /// Goal reached / level clear - rising arpeggio
    Goal,
    /// Run lost
    GameOver,
    /// Run won - fanfare
    Win,
}

impl SoundEffect {
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Move => SoundEffect::Move,
            GameEvent::WallBump | GameEvent::ShieldBlock => SoundEffect::Wall,
            GameEvent::Crash | GameEvent::Clash => SoundEffect::Crash,
            GameEvent::EnemyKill => SoundEffect::Kill,
            GameEvent::Health => SoundEffect::Health,
            GameEvent::Gold => SoundEffect::Gold,
            GameEvent::Hurt | GameEvent::Tag => SoundEffect::Hurt,
            GameEvent::GoalReached | GameEvent::LevelClear => SoundEffect::Goal,
            GameEvent::GameOver => SoundEffect::GameOver,
            GameEvent::Victory => SoundEffect::Win,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Move => "move.wav",
            SoundEffect::Wall => "wall.wav",
            SoundEffect::Crash => "crash.wav",
            SoundEffect::Kill => "kill.wav",
            SoundEffect::Health => "health.wav",
            SoundEffect::Gold => "gold.wav",
            SoundEffect::Hurt => "hurt.wav",
            SoundEffect::Goal => "goal.wav",
            SoundEffect::GameOver => "gameover.wav",
            SoundEffect::Win => "win.wav",
        }
    }

    /// Notes as (frequency Hz, duration ms) plus volume (0.0 - 1.0)
    fn notes(self) -> (&'static [(u32, u32)], f32) {
        match self {
            SoundEffect::Move => (&[(440, 40)], 0.15),
            SoundEffect::Wall => (&[(110, 80)], 0.25),
            SoundEffect::Crash => (&[(80, 200)], 0.4),
            SoundEffect::Kill => (&[(200, 60)], 0.3),
            SoundEffect::Health => (&[(880, 80)], 0.2),
            SoundEffect::Gold => (&[(660, 50)], 0.2),
            SoundEffect::Hurt => (&[(150, 120)], 0.35),
            SoundEffect::Goal => (&[(523, 80), (659, 80), (784, 120)], 0.2),
            SoundEffect::GameOver => (&[(220, 300)], 0.3),
            SoundEffect::Win => (&[(523, 100), (659, 100), (784, 100), (1047, 200)], 0.25),
        }
    }

    /// Complete WAV file for this effect
    pub fn wav(self) -> Vec<u8> {
        let (notes, volume) = self.notes();
        wav_bytes(&square_wave(notes, volume))
    }
}

/// Unsigned 8-bit square-wave samples for a note sequence, centred on 127
pub fn square_wave(notes: &[(u32, u32)], volume: f32) -> Vec<u8> {
    let amplitude = 127.0 * volume.clamp(0.0, 1.0);
    let high = (127.0 + amplitude) as u8;
    let low = (127.0 - amplitude) as u8;

    let mut samples = Vec::new();
    for &(freq, duration_ms) in notes {
        let n = (SAMPLE_RATE as u64 * duration_ms as u64 / 1000) as usize;
        let half_period = (SAMPLE_RATE / freq.max(1).saturating_mul(2)).max(1) as usize;
        samples.extend((0..n).map(|i| if (i / half_period) % 2 == 1 { high } else { low }));
    }
    samples
}

/// Wrap raw samples in a mono 8-bit PCM WAV header
pub fn wav_bytes(samples: &[u8]) -> Vec<u8> {
    let data_len = samples.len() as u32;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + samples.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes()); // byte rate
    out.extend_from_slice(&1u16.to_le_bytes()); // block align
    out.extend_from_slice(&8u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(samples);
    out
}

/// Platform player program and its leading arguments
fn player() -> Option<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        Some(("afplay", &[]))
    } else if cfg!(unix) {
        Some(("aplay", &["-q"]))
    } else {
        None
    }
}

/// Audio manager for the game
pub struct AudioManager {
    muted: bool,
    cache_dir: PathBuf,
    written: HashSet<SoundEffect>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            muted: false,
            cache_dir: std::env::temp_dir().join("dungeon-duel-sfx"),
            written: HashSet::new(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect without waiting for it
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        if let Err(err) = self.spawn(effect) {
            log::debug!("Could not play {effect:?}: {err}");
        }
    }

    /// Path of the effect's WAV file, synthesising it on first use
    fn cached_file(&mut self, effect: SoundEffect) -> io::Result<PathBuf> {
        let path = self.cache_dir.join(effect.file_name());
        if !self.written.contains(&effect) {
            fs::create_dir_all(&self.cache_dir)?;
            fs::write(&path, effect.wav())?;
            self.written.insert(effect);
        }
        Ok(path)
    }

    fn spawn(&mut self, effect: SoundEffect) -> io::Result<()> {
        let Some((program, args)) = player() else {
            return Ok(());
        };
        let path = self.cached_file(effect)?;
        let mut child = Command::new(program)
            .args(args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // Reap in the background so playback never blocks a turn
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

impl NotificationSink for AudioManager {
    fn notify(&mut self, event: GameEvent) {
        self.play(SoundEffect::for_event(event));
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    #[test]
    fn test_wav_header() {
        let wav = SoundEffect::Move.wav();
        let data_len = wav.len() - WAV_HEADER_LEN;
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4) as usize, 36 + data_len);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), SAMPLE_RATE);
        assert_eq!(u16_at(&wav, 34), 8);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40) as usize, data_len);
    }

    #[test]
    fn test_square_wave_shape() {
        // 441 ms at 22050 Hz is 9724 samples (truncated); 1 kHz gives an
        // 11-sample half period
        let samples = square_wave(&[(1000, 441)], 0.5);
        assert_eq!(samples.len(), 9724);
        assert!(samples[..11].iter().all(|s| *s == 63));
        assert!(samples[11..22].iter().all(|s| *s == 190));
    }

    #[test]
    fn test_jingle_concatenates_notes() {
        let jingle = square_wave(&[(523, 80), (659, 80), (784, 120)], 0.2);
        assert_eq!(jingle.len(), 1764 + 1764 + 2646);
        assert_eq!(
            SoundEffect::Win.wav().len(),
            WAV_HEADER_LEN + 2205 * 3 + 4410
        );
    }

    #[test]
    fn test_extreme_inputs_do_not_panic() {
        assert!(square_wave(&[(0, 10)], 2.0).iter().all(|s| *s == 0 || *s == 254));
        assert!(!square_wave(&[(100_000, 5)], 0.3).is_empty());
        assert!(square_wave(&[], 0.3).is_empty());
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(GameEvent::Victory), SoundEffect::Win);
        assert_eq!(SoundEffect::for_event(GameEvent::Tag), SoundEffect::Hurt);
        assert_eq!(SoundEffect::for_event(GameEvent::LevelClear), SoundEffect::Goal);
    }

    #[test]
    fn test_muted_manager_is_silent() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        assert!(audio.is_muted());
        // Returns before touching the filesystem or spawning anything
        audio.notify(GameEvent::Crash);
        assert!(audio.written.is_empty());
    }
}

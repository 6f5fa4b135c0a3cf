//! Best-run record for Classic and Tron
//!
//! A single record: most gold wins, fewer turns breaks ties. Stored as two
//! lines (gold, then turns). Every I/O failure is swallowed; a broken record
//! file never affects the run that is being scored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default record file name
pub const DEFAULT_BEST_RUN_FILE: &str = "dungeon_highscore.txt";

/// A finished run's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRun {
    pub gold: u32,
    pub turns: u32,
}

impl BestRun {
    pub fn new(gold: u32, turns: u32) -> Self {
        Self { gold, turns }
    }

    /// Strictly more gold, or equal gold in strictly fewer turns
    pub fn beats(&self, other: &BestRun) -> bool {
        self.gold > other.gold || (self.gold == other.gold && self.turns < other.turns)
    }

    /// Parse the two-line record; `None` if either line is missing or bad
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let gold = lines.next()?.parse().ok()?;
        let turns = lines.next()?.parse().ok()?;
        Some(Self { gold, turns })
    }

    pub fn to_record(&self) -> String {
        format!("{}\n{}\n", self.gold, self.turns)
    }
}

/// What happened to the stored record at run end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordUpdate {
    /// Nothing stored yet; this run was saved
    FirstRun,
    /// This run beat the stored one and replaced it
    NewBest { previous: BestRun },
    /// Stored record stands
    NotBetter { best: BestRun },
}

/// File-backed best-run record
#[derive(Debug, Clone)]
pub struct BestRunStore {
    path: PathBuf,
}

impl BestRunStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored record, or `None` when missing or unreadable
    pub fn load(&self) -> Option<BestRun> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let best = BestRun::parse(&text);
                if best.is_none() {
                    log::warn!("Ignoring malformed best-run file {}", self.path.display());
                }
                best
            }
            Err(err) => {
                log::debug!("No best run at {}: {err}", self.path.display());
                None
            }
        }
    }

    /// Overwrite the record (best-effort)
    pub fn save(&self, run: &BestRun) {
        match fs::write(&self.path, run.to_record()) {
            Ok(()) => log::info!("Best run saved ({} gold, {} turns)", run.gold, run.turns),
            Err(err) => log::warn!("Failed to save best run to {}: {err}", self.path.display()),
        }
    }

    /// Compare `run` against the stored record and save it if it wins
    pub fn record(&self, run: BestRun) -> RecordUpdate {
        match self.load() {
            None => {
                self.save(&run);
                RecordUpdate::FirstRun
            }
            Some(best) if run.beats(&best) => {
                self.save(&run);
                RecordUpdate::NewBest { previous: best }
            }
            Some(best) => RecordUpdate::NotBetter { best },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn temp_store(name: &str) -> BestRunStore {
        let path = std::env::temp_dir().join(format!(
            "dungeon-duel-{}-{}.txt",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        BestRunStore::new(path)
    }

    #[test]
    fn test_comparison_examples() {
        assert!(BestRun::new(3, 50).beats(&BestRun::new(2, 10)));
        assert!(!BestRun::new(3, 60).beats(&BestRun::new(3, 50)));
        assert!(BestRun::new(4, 999).beats(&BestRun::new(3, 1)));
        assert!(BestRun::new(3, 49).beats(&BestRun::new(3, 50)));
        assert!(!BestRun::new(3, 50).beats(&BestRun::new(3, 50)));
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(BestRun::parse("3\n50\n"), Some(BestRun::new(3, 50)));
        assert_eq!(BestRun::parse(" 7 \r\n 12"), Some(BestRun::new(7, 12)));
        assert_eq!(BestRun::parse("3\n"), None);
        assert_eq!(BestRun::parse("three\n50\n"), None);
        assert_eq!(BestRun::parse(""), None);
    }

    #[test]
    fn test_record_lifecycle() {
        let store = temp_store("lifecycle");
        assert_eq!(store.load(), None);

        assert_eq!(store.record(BestRun::new(2, 10)), RecordUpdate::FirstRun);
        assert_eq!(store.load(), Some(BestRun::new(2, 10)));

        assert_eq!(
            store.record(BestRun::new(3, 50)),
            RecordUpdate::NewBest {
                previous: BestRun::new(2, 10)
            }
        );
        assert_eq!(
            store.record(BestRun::new(3, 60)),
            RecordUpdate::NotBetter {
                best: BestRun::new(3, 50)
            }
        );
        assert_eq!(store.load(), Some(BestRun::new(3, 50)));

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_corrupt_file_is_treated_as_missing() {
        let store = temp_store("corrupt");
        fs::write(store.path(), "not a number").unwrap();
        assert_eq!(store.load(), None);
        assert_eq!(store.record(BestRun::new(1, 5)), RecordUpdate::FirstRun);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let store = BestRunStore::new(std::env::temp_dir().join("no-such-dir-dd").join("best.txt"));
        // Neither call may panic
        store.save(&BestRun::new(1, 1));
        assert_eq!(store.record(BestRun::new(1, 1)), RecordUpdate::FirstRun);
    }

    proptest! {
        #[test]
        fn prop_beats_is_strict_order(a in 0u32..20, b in 0u32..20, c in 0u32..20, d in 0u32..20) {
            let x = BestRun::new(a, b);
            let y = BestRun::new(c, d);
            // Irreflexive and asymmetric
            prop_assert!(!x.beats(&x));
            prop_assert!(!(x.beats(&y) && y.beats(&x)));
            // Total on distinct records
            if x != y {
                prop_assert!(x.beats(&y) || y.beats(&x));
            }
        }
    }
}

//! Moves and committed move-pairs

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One unit step (or a deliberate wait)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Wait,
}

impl Move {
    /// The four real directions, in a fixed order
    pub const DIRECTIONS: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Displacement vector (`x` = columns, `y` = rows)
    pub fn delta(self) -> IVec2 {
        match self {
            Move::Up => IVec2::new(0, -1),
            Move::Down => IVec2::new(0, 1),
            Move::Left => IVec2::new(-1, 0),
            Move::Right => IVec2::new(1, 0),
            Move::Wait => IVec2::ZERO,
        }
    }

    /// Single-letter code used at the prompt (R/L/U/D/W)
    pub fn letter(self) -> char {
        match self {
            Move::Up => 'U',
            Move::Down => 'D',
            Move::Left => 'L',
            Move::Right => 'R',
            Move::Wait => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'U' => Some(Move::Up),
            'D' => Some(Move::Down),
            'L' => Some(Move::Left),
            'R' => Some(Move::Right),
            'W' => Some(Move::Wait),
            _ => None,
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "up" => Some(Move::Up),
            "down" => Some(Move::Down),
            "left" => Some(Move::Left),
            "right" => Some(Move::Right),
            "wait" => Some(Move::Wait),
            _ => None,
        }
    }

    pub fn is_wait(self) -> bool {
        self == Move::Wait
    }
}

/// Exactly two moves: one committed duel turn for one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MovePair(pub [Move; 2]);

impl MovePair {
    pub const WAIT: MovePair = MovePair([Move::Wait, Move::Wait]);

    pub const fn new(first: Move, second: Move) -> Self {
        Self([first, second])
    }

    /// Move queued for `sub_step`
    ///
    /// # Panics
    ///
    /// If `sub_step` is not 0 or 1 (the two sub-steps of a pass).
    pub fn get(&self, sub_step: usize) -> Move {
        self.0[sub_step]
    }

    /// Parse player input. Accepts letter codes (`"RU"`, `"r u"`) or words
    /// (`"right up"`), case-insensitive. Any slot that is missing or does not
    /// parse becomes [`Move::Wait`]; parsing never fails.
    pub fn parse(input: &str) -> Self {
        let words: Vec<&str> = input.split_whitespace().collect();
        if !words.is_empty() && words.iter().all(|w| Move::from_word(w).is_some()) {
            let mut slots = words.iter().filter_map(|w| Move::from_word(w));
            return Self::new(
                slots.next().unwrap_or_default(),
                slots.next().unwrap_or_default(),
            );
        }

        let mut letters = input.chars().filter(|c| !c.is_whitespace());
        let mut slot = || {
            letters
                .next()
                .and_then(Move::from_letter)
                .unwrap_or_default()
        };
        let first = slot();
        let second = slot();
        Self::new(first, second)
    }

    /// Letter code, e.g. `"RU"`
    pub fn code(&self) -> String {
        self.0.iter().map(|m| m.letter()).collect()
    }
}

//! Start-up menus

use std::io::{self, BufRead, Write};

use super::TerminalInput;
use crate::game::{Opponent, PlayMode};
use crate::sim::{CrawlMode, Difficulty};

const TITLE: [&str; 5] = [
    "+------------------------------+",
    "|   DUNGEON DUEL               |",
    "|   Reach G. Kill E.           |",
    "|   + health   $ gold          |",
    "+------------------------------+",
];

impl<R: BufRead, W: Write> TerminalInput<R, W> {
    /// Main menu; `None` when input ends before a choice
    pub fn choose_mode(&mut self) -> io::Result<Option<PlayMode>> {
        self.say("")?;
        for line in TITLE {
            self.say(line)?;
        }
        self.say("")?;
        self.say("1 = Classic   (no trail)")?;
        self.say("2 = Tron      (you leave trail = ; don't crash into it!)")?;
        self.say("3 = Blind Duel   (2-player or vs Computer, simultaneous moves!)")?;
        self.say("")?;

        loop {
            let Some(answer) = self.prompt("Choose mode (1, 2, or 3): ")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => return Ok(Some(PlayMode::Crawl(CrawlMode::Classic))),
                "2" => return Ok(Some(PlayMode::Crawl(CrawlMode::Tron))),
                "3" => return Ok(Some(PlayMode::Duel)),
                _ => self.say("Enter 1, 2, or 3.")?,
            }
        }
    }

    /// Blind Duel opponent menu
    pub fn choose_opponent(&mut self) -> io::Result<Option<Opponent>> {
        self.say("")?;
        self.say("BLIND DUEL: Hero (@) vs Warden (W). Both commit 2 moves, then reveal!")?;
        self.say("")?;
        self.say("1 = 2 Player   (Hero vs Warden on same keyboard)")?;
        self.say("2 = vs Computer   (Hero vs AI Warden)")?;
        self.say("")?;

        loop {
            let Some(answer) = self.prompt("Choose (1 or 2): ")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => return Ok(Some(Opponent::Human)),
                "2" => break,
                _ => self.say("Enter 1 or 2.")?,
            }
        }

        self.say("")?;
        self.say("Easy / Medium / Hard?")?;
        let answer = self.prompt("Difficulty (e/m/h): ")?.unwrap_or_default();
        Ok(Some(Opponent::Computer(difficulty_for(&answer))))
    }
}

/// Anything unrecognised is Medium
fn difficulty_for(answer: &str) -> Difficulty {
    Difficulty::from_str(answer).unwrap_or(Difficulty::Medium)
}

#[cfg(test)]
mod tests {
    use super::super::tests::scripted;
    use super::*;

    #[test]
    fn test_mode_menu_retries_until_valid() {
        let mut input = scripted("5\n\n2\n");
        assert_eq!(
            input.choose_mode().unwrap(),
            Some(PlayMode::Crawl(CrawlMode::Tron))
        );
        let out = String::from_utf8(input.into_parts().1).unwrap();
        assert_eq!(out.matches("Enter 1, 2, or 3.").count(), 2);
    }

    #[test]
    fn test_mode_menu_end_of_input() {
        assert_eq!(scripted("").choose_mode().unwrap(), None);
        assert_eq!(scripted("x\n").choose_mode().unwrap(), None);
    }

    #[test]
    fn test_opponent_menu() {
        assert_eq!(scripted("1\n").choose_opponent().unwrap(), Some(Opponent::Human));
        assert_eq!(
            scripted("2\nh\n").choose_opponent().unwrap(),
            Some(Opponent::Computer(Difficulty::Hard))
        );
        assert_eq!(
            scripted("3\n2\n\n").choose_opponent().unwrap(),
            Some(Opponent::Computer(Difficulty::Medium))
        );
    }

    #[test]
    fn test_difficulty_answers() {
        assert_eq!(difficulty_for("E"), Difficulty::Easy);
        assert_eq!(difficulty_for("hard"), Difficulty::Hard);
        assert_eq!(difficulty_for("?"), Difficulty::Medium);
    }
}

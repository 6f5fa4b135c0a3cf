//! Terminal input provider
//!
//! Line prompts for duel moves, ping decisions, acknowledgements and menus
//! are read from any `BufRead`. Crawl keys bypass that reader and come
//! straight from the controlling terminal in raw mode.

pub mod keys;
pub mod menu;

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    terminal::{Clear, ClearType},
};

use crate::ports::{InputProvider, Role, StepCommand};
use crate::sim::MovePair;

pub struct TerminalInput<R, W> {
    input: R,
    out: W,
}

impl TerminalInput<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalInput<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.out)
    }

    /// Print one indented line
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "  {text}\r\n")
    }

    /// Print `text` and read one trimmed answer; `None` at end of input
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "  {text}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_move_pair(&mut self, role: Role) -> io::Result<Option<MovePair>> {
        let text = format!("{}: Enter 2 moves (e.g. RU, LD, WW): ", role.name());
        let Some(answer) = self.prompt(&text)? else {
            return Ok(None);
        };
        if is_quit(&answer) {
            return Ok(None);
        }
        // Hide the committed moves from the other player
        queue!(self.out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
        self.out.flush()?;
        Ok(Some(MovePair::parse(&answer)))
    }
}

fn is_quit(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit")
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

impl<R: BufRead, W: Write> InputProvider for TerminalInput<R, W> {
    fn move_pair(&mut self, role: Role) -> Option<MovePair> {
        self.read_move_pair(role).unwrap_or_else(|err| {
            log::warn!("Failed to read moves: {err}");
            None
        })
    }

    fn ping_decision(&mut self) -> bool {
        match self.prompt("Warden: Ping to reveal Hero in 3x3? (y/n): ") {
            Ok(answer) => answer.is_some_and(|a| is_yes(&a)),
            Err(err) => {
                log::warn!("Failed to read ping answer: {err}");
                false
            }
        }
    }

    fn step_command(&mut self) -> StepCommand {
        keys::read_step_command().unwrap_or_else(|err| {
            log::warn!("Failed to read key: {err}");
            StepCommand::Quit
        })
    }

    fn acknowledge(&mut self, prompt: &str) {
        let result = self.say("").and_then(|()| self.prompt(prompt));
        if let Err(err) = result {
            log::warn!("Failed to read acknowledgement: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Move;
    use std::io::Cursor;

    pub(crate) fn scripted(answers: &str) -> TerminalInput<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalInput::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    fn output(input: TerminalInput<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(input.into_parts().1).unwrap()
    }

    #[test]
    fn test_move_pair_prompt() {
        let mut input = scripted("RU\n\nquit\n");
        assert_eq!(
            input.move_pair(Role::Evader),
            Some(MovePair::new(Move::Right, Move::Up))
        );
        // Empty answer waits twice
        assert_eq!(input.move_pair(Role::Seeker), Some(MovePair::WAIT));
        assert_eq!(input.move_pair(Role::Evader), None);
        // End of input quits too
        assert_eq!(input.move_pair(Role::Evader), None);

        let out = output(input);
        assert!(out.contains("Hero: Enter 2 moves (e.g. RU, LD, WW): "));
        assert!(out.contains("Warden: Enter 2 moves"));
    }

    #[test]
    fn test_ping_decision() {
        let mut input = scripted("y\nn\nYES\n");
        assert!(input.ping_decision());
        assert!(!input.ping_decision());
        assert!(input.ping_decision());
        assert!(!input.ping_decision());
    }

    #[test]
    fn test_acknowledge_consumes_one_line() {
        let mut input = scripted("anything\nRU\n");
        input.acknowledge("Press Enter to REVEAL...");
        assert_eq!(
            input.move_pair(Role::Evader),
            Some(MovePair::new(Move::Right, Move::Up))
        );
        assert!(output(input).contains("Press Enter to REVEAL..."));
    }
}

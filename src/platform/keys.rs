//! Single-key input for Classic and Tron

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::ports::StepCommand;
use crate::sim::Move;

/// Map a key press to a crawl command. Arrows and w/a/s/d move, `m`
/// toggles sound, `q`, Esc and Ctrl-C quit.
pub fn command_for_key(key: KeyEvent) -> StepCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return StepCommand::Quit;
    }
    match key.code {
        KeyCode::Up => StepCommand::Step(Move::Up),
        KeyCode::Down => StepCommand::Step(Move::Down),
        KeyCode::Left => StepCommand::Step(Move::Left),
        KeyCode::Right => StepCommand::Step(Move::Right),
        KeyCode::Esc => StepCommand::Quit,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => StepCommand::Step(Move::Up),
            's' => StepCommand::Step(Move::Down),
            'a' => StepCommand::Step(Move::Left),
            'd' => StepCommand::Step(Move::Right),
            'm' => StepCommand::ToggleMute,
            'q' => StepCommand::Quit,
            _ => StepCommand::Ignored,
        },
        _ => StepCommand::Ignored,
    }
}

/// Block for one key press on the controlling terminal. Raw mode is only
/// held while waiting, so line prompts keep working afterwards.
pub fn read_step_command() -> io::Result<StepCommand> {
    terminal::enable_raw_mode()?;
    let key = next_key_press();
    terminal::disable_raw_mode()?;
    key.map(command_for_key)
}

fn next_key_press() -> io::Result<KeyEvent> {
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(key),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(command_for_key(key(KeyCode::Up)), StepCommand::Step(Move::Up));
        assert_eq!(command_for_key(key(KeyCode::Left)), StepCommand::Step(Move::Left));
        assert_eq!(command_for_key(key(KeyCode::Char('d'))), StepCommand::Step(Move::Right));
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            StepCommand::Step(Move::Down)
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(command_for_key(key(KeyCode::Char('m'))), StepCommand::ToggleMute);
        assert_eq!(command_for_key(key(KeyCode::Char('Q'))), StepCommand::Quit);
        assert_eq!(command_for_key(key(KeyCode::Esc)), StepCommand::Quit);
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            StepCommand::Quit
        );
        assert_eq!(command_for_key(key(KeyCode::Char('x'))), StepCommand::Ignored);
        assert_eq!(command_for_key(key(KeyCode::Enter)), StepCommand::Ignored);
    }
}

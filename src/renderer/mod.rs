//! Terminal rendering module
//!
//! Draws each frame from scratch with crossterm: clear, header, colored
//! grid, HUD, status flags and the last message. Lines end in `\r\n` so a
//! frame reads the same whether or not raw mode is active.

pub mod palette;

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, PrintStyledContent, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::consts::PING_RADIUS;
use crate::ports::{Frame, PresentationSink};
use crate::sim::{Cell, Position};

const INDENT: &str = "  ";

/// Presentation sink writing ANSI frames to any byte stream
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(INDENT), Print(text), Print("\r\n"))
    }

    fn colored_line(&mut self, color: Color, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            Print(INDENT),
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\r\n")
        )
    }

    fn draw_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.clear()?;
        self.colored_line(Color::White, frame.header)?;
        self.line(frame.help)?;
        self.line("")?;

        let reveal = frame.evader.filter(|_| frame.flags.ping_visible);
        for (row, cells) in frame.grid.rows().enumerate() {
            queue!(self.out, Print(INDENT))?;
            for (col, &cell) in cells.iter().enumerate() {
                let pos = Position::new(row as i32, col as i32);
                let shown = overlay(frame, pos, cell);
                let pinged = reveal.is_some_and(|e| within_ping(e, pos));
                queue!(
                    self.out,
                    PrintStyledContent(palette::styled_cell(shown, frame.seeker_glyph, pinged))
                )?;
            }
            queue!(self.out, ResetColor, Print("\r\n"))?;
        }

        self.line("")?;
        let mut hud = format!("HP: {}/{}   Turn: {}", frame.health, frame.max_health, frame.turn);
        if let Some(crawl) = frame.crawl {
            hud.push_str(&format!("   Kills: {}   Gold: {}", crawl.kills, crawl.gold));
        }
        self.line(&hud)?;

        if frame.flags.shield_ready {
            self.colored_line(Color::Cyan, "[Mirror Shield ready]")?;
        }
        if frame.flags.seeker_stunned {
            self.colored_line(Color::Yellow, "Warden is STUNNED this turn!")?;
        }
        if frame.flags.ping_visible {
            self.colored_line(Color::Magenta, "*** PING: Hero revealed in 3x3! ***")?;
        }
        if !frame.message.is_empty() {
            self.line(&format!(">> {}", frame.message))?;
        }
        self.out.flush()
    }

    fn draw_announcement(&mut self, title: &str, lines: &[String]) -> io::Result<()> {
        self.clear()?;
        self.line("")?;
        self.colored_line(Color::Yellow, &format!("*** {title} ***"))?;
        self.line("")?;
        for text in lines {
            self.line(text)?;
        }
        self.out.flush()
    }
}

/// Duel agents are drawn over whatever cell they stand on; the evader wins
/// a shared cell
fn overlay(frame: &Frame<'_>, pos: Position, cell: Cell) -> Cell {
    if frame.evader == Some(pos) {
        Cell::Evader
    } else if frame.seeker == Some(pos) {
        Cell::Seeker
    } else {
        cell
    }
}

fn within_ping(center: Position, pos: Position) -> bool {
    (pos.row - center.row).abs() <= PING_RADIUS && (pos.col - center.col).abs() <= PING_RADIUS
}

impl<W: Write> PresentationSink for TerminalRenderer<W> {
    fn present(&mut self, frame: &Frame<'_>) {
        if let Err(err) = self.draw_frame(frame) {
            log::warn!("Failed to draw frame: {err}");
        }
    }

    fn announce(&mut self, title: &str, lines: &[String]) {
        if let Err(err) = self.draw_announcement(title, lines) {
            log::warn!("Failed to draw announcement: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{CrawlHud, Flags};
    use crate::sim::Grid;

    fn render(frame: &Frame<'_>) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.present(frame);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    fn duel_frame<'a>(grid: &'a Grid, flags: Flags) -> Frame<'a> {
        Frame {
            header: "BLIND DUEL - Level 1/3",
            grid,
            evader: Some(Position::new(1, 1)),
            seeker: Some(Position::new(1, 3)),
            seeker_glyph: 'W',
            health: 4,
            max_health: 5,
            turn: 3,
            crawl: None,
            flags,
            message: "Clean move.",
            help: "help line",
        }
    }

    #[test]
    fn test_duel_frame_text() {
        let grid = Grid::parse(&["#####", "#...#", "#..G#", "#####"]).unwrap();
        let out = render(&duel_frame(
            &grid,
            Flags {
                shield_ready: true,
                seeker_stunned: true,
                ping_visible: false,
            },
        ));
        assert!(out.contains("BLIND DUEL - Level 1/3"));
        assert!(out.contains("HP: 4/5   Turn: 3"));
        assert!(!out.contains("Kills"));
        assert!(out.contains("[Mirror Shield ready]"));
        assert!(out.contains("Warden is STUNNED this turn!"));
        assert!(!out.contains("PING"));
        assert!(out.contains(">> Clean move."));
        // Overlaid agents replace the floor under them
        assert!(out.contains('@'));
        assert!(out.contains('W'));
    }

    #[test]
    fn test_ping_highlights_neighbourhood() {
        let grid = Grid::parse(&["#####", "#...#", "#..G#", "#####"]).unwrap();
        let quiet = render(&duel_frame(&grid, Flags::default()));
        let pinged = render(&duel_frame(
            &grid,
            Flags {
                ping_visible: true,
                ..Flags::default()
            },
        ));
        assert!(pinged.contains("*** PING: Hero revealed in 3x3! ***"));
        // DarkYellow background escape appears only while revealed
        assert!(pinged.contains("\x1b[48;5;3m"));
        assert!(!quiet.contains("\x1b[48;5;3m"));
    }

    #[test]
    fn test_crawl_hud_and_enemy_glyph() {
        let grid = Grid::parse(&["#####", "#@E.#", "#####"]).unwrap();
        let out = render(&Frame {
            header: "CLASSIC",
            grid: &grid,
            evader: None,
            seeker: None,
            seeker_glyph: 'E',
            health: 2,
            max_health: 5,
            turn: 9,
            crawl: Some(CrawlHud { kills: 1, gold: 3 }),
            flags: Flags::default(),
            message: "",
            help: "",
        });
        assert!(out.contains("HP: 2/5   Turn: 9   Kills: 1   Gold: 3"));
        assert!(out.contains('E'));
        assert!(!out.contains(">>"));
    }

    #[test]
    fn test_within_ping_is_three_by_three() {
        let center = Position::new(2, 2);
        assert!(within_ping(center, Position::new(1, 1)));
        assert!(within_ping(center, Position::new(3, 3)));
        assert!(!within_ping(center, Position::new(0, 2)));
        assert!(!within_ping(center, Position::new(2, 4)));
    }

    #[test]
    fn test_announcement() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.announce("LEVEL 1 CLEAR", &["Hero HP: 4/5".to_string()]);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("*** LEVEL 1 CLEAR ***"));
        assert!(out.contains("Hero HP: 4/5"));
    }
}

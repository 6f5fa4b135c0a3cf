//! Glyph colors for grid cells

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};

use crate::sim::Cell;

/// Background of cells inside an active ping reveal
pub const PING_BACKGROUND: Color = Color::DarkYellow;

/// Foreground color and weight for a cell
fn cell_color(cell: Cell) -> (Color, bool) {
    match cell {
        Cell::Evader => (Color::Cyan, true),
        Cell::Seeker => (Color::Red, true),
        Cell::Goal | Cell::Health => (Color::Green, true),
        Cell::Gold => (Color::Yellow, true),
        Cell::Wall | Cell::Trail => (Color::DarkGrey, false),
        Cell::Floor => (Color::Grey, false),
    }
}

/// Styled glyph for one cell. `seeker_glyph` distinguishes the duel
/// warden from crawl enemies, which share a cell tag.
pub fn styled_cell(cell: Cell, seeker_glyph: char, pinged: bool) -> StyledContent<char> {
    let (fg, bold) = cell_color(cell);
    let mut style = ContentStyle::new();
    style.foreground_color = Some(fg);
    if bold {
        style.attributes.set(Attribute::Bold);
    }
    if pinged {
        style.background_color = Some(PING_BACKGROUND);
    }
    let glyph = if cell == Cell::Seeker {
        seeker_glyph
    } else {
        cell.glyph()
    };
    StyledContent::new(style, glyph)
}

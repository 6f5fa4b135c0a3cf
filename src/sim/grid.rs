//! Grid model shared by every play mode
//!
//! A rectangular field of single-glyph cells. Out-of-bounds lookups read as
//! wall, which is the boundary contract every step check relies on.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cell tags (fixed alphabet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Floor,
    Wall,
    Goal,
    Health,
    Gold,
    /// Tron light trail (lethal to touch)
    Trail,
    /// Warden in Blind Duel, enemy in Classic/Tron
    Seeker,
    /// Hero / player
    Evader,
}

impl Cell {
    /// Parse a template glyph. Both `W` (duel warden) and `E` (crawl enemy)
    /// map to [`Cell::Seeker`].
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Cell::Floor),
            '#' => Some(Cell::Wall),
            'G' => Some(Cell::Goal),
            '+' => Some(Cell::Health),
            '$' => Some(Cell::Gold),
            '=' => Some(Cell::Trail),
            'W' | 'E' => Some(Cell::Seeker),
            '@' => Some(Cell::Evader),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Floor => '.',
            Cell::Wall => '#',
            Cell::Goal => 'G',
            Cell::Health => '+',
            Cell::Gold => '$',
            Cell::Trail => '=',
            Cell::Seeker => 'W',
            Cell::Evader => '@',
        }
    }

    /// Cells an agent may step into without incident
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Floor | Cell::Goal | Cell::Health | Cell::Gold)
    }
}

/// A (row, column) grid coordinate. May point outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Offset by a displacement vector (`x` = columns, `y` = rows)
    #[inline]
    pub fn offset(self, delta: IVec2) -> Self {
        Self {
            row: self.row + delta.y,
            col: self.col + delta.x,
        }
    }

    /// Manhattan distance
    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Reasons a level template cannot be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level template has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown glyph {glyph:?} at ({row}, {col})")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("level has no {0:?} marker")]
    MissingMarker(Cell),
    #[error("level has {count} {cell:?} markers, expected exactly one")]
    DuplicateMarker { cell: Cell, count: usize },
}

/// Rectangular cell grid (row-major storage). Serialized as glyph rows;
/// deserializing goes through [`Grid::parse`], so a loaded grid is always
/// rectangular.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from template rows. The template is copied; the returned
    /// grid never aliases it.
    pub fn parse(rows: &[&str]) -> Result<Self, LevelError> {
        let first = rows.first().ok_or(LevelError::Empty)?;
        let width = first.chars().count();
        if width == 0 {
            return Err(LevelError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (r, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row: r,
                    expected: width,
                    found,
                });
            }
            for (c, glyph) in line.chars().enumerate() {
                let cell = Cell::from_glyph(glyph).ok_or(LevelError::UnknownGlyph {
                    glyph,
                    row: r,
                    col: c,
                })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }

    /// Cell at `pos`; anything outside the grid reads as [`Cell::Wall`]
    pub fn cell_at(&self, pos: Position) -> Cell {
        self.index(pos).map_or(Cell::Wall, |i| self.cells[i])
    }

    /// Overwrite the cell at `pos`. Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// All positions holding `cell`, in row-major scan order
    pub fn find_all(&self, cell: Cell) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == cell)
            .map(|(i, _)| Position::new((i / self.width) as i32, (i % self.width) as i32))
            .collect()
    }

    /// Exactly one position holding `cell`, or a marker error
    pub fn find_unique(&self, cell: Cell) -> Result<Position, LevelError> {
        match self.find_all(cell).as_slice() {
            [] => Err(LevelError::MissingMarker(cell)),
            [pos] => Ok(*pos),
            many => Err(LevelError::DuplicateMarker {
                cell,
                count: many.len(),
            }),
        }
    }

    /// Where a mover at `from` ends up after attempting `delta`. A wall
    /// target (including out of bounds) leaves it in place.
    pub fn try_step(&self, from: Position, delta: IVec2) -> Position {
        let target = from.offset(delta);
        if self.cell_at(target) == Cell::Wall {
            from
        } else {
            target
        }
    }

    /// Iterate rows as cell slices
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = LevelError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        Grid::parse(&rows)
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.rows()
            .map(|row| row.iter().map(|c| c.glyph()).collect())
            .collect()
    }
}

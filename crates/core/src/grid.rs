//! Grid module - manages the game board
//!
//! The grid is `cols x rows` cells, each holding a colour value: `0` is empty,
//! `1..=PIECE_COUNT` is filled. Uses a flat row-major vector (`y * cols + x`).
//!
//! Pieces are placed by centring their 3x3 window on a target cell. Full rows and
//! columns are detected together after every placement and cleared as a batch,
//! so a row and a column crossing at the new piece both count.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::pieces::Piece;
use crate::types::{Coordinate, PIECE_COUNT};

/// A full row or column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "axis", content = "index", rename_all = "snake_case")]
pub enum Line {
    Row(usize),
    Column(usize),
}

/// Why a piece does not fit at an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementError {
    /// A shape cell falls outside the board
    OutOfBounds { x: i32, y: i32 },
    /// A shape cell lands on a filled cell
    Occupied { x: i32, y: i32 },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBounds { x, y } => write!(f, "cell ({x}, {y}) is off the board"),
            PlacementError::Occupied { x, y } => write!(f, "cell ({x}, {y}) is already filled"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    /// Flat array of cell values, row-major order (y * cols + x)
    cells: Vec<u8>,
    /// Colour written by the next placement, cycles 1..=PIECE_COUNT
    colour: u8,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
            colour: 1,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the value at (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set the value at (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Colour the next placed piece will be painted with
    pub fn colour(&self) -> u8 {
        self.colour
    }

    /// Report the first shape cell that prevents placing `piece` centred on (x, y)
    pub fn check_placement(&self, piece: &Piece, x: i32, y: i32) -> Result<(), PlacementError> {
        for (dx, dy) in piece.offsets() {
            let (px, py) = (x + dx, y + dy);
            match self.get(px, py) {
                Some(0) => {}
                Some(_) => return Err(PlacementError::Occupied { x: px, y: py }),
                None => return Err(PlacementError::OutOfBounds { x: px, y: py }),
            }
        }
        Ok(())
    }

    /// Whether `piece` fits centred on (x, y)
    pub fn can_place(&self, piece: &Piece, x: i32, y: i32) -> bool {
        self.check_placement(piece, x, y).is_ok()
    }

    /// Paint `piece` centred on (x, y) with the current colour
    ///
    /// The fit is checked first; on error nothing is written and the colour does
    /// not advance.
    pub fn place(&mut self, piece: &Piece, x: i32, y: i32) -> Result<(), PlacementError> {
        self.check_placement(piece, x, y)?;

        let colour = self.colour;
        for (dx, dy) in piece.offsets() {
            self.set(x + dx, y + dy, colour);
        }
        trace!(piece = %piece, x, y, colour, "painted piece");

        self.colour = if colour >= PIECE_COUNT { 1 } else { colour + 1 };
        Ok(())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.rows {
            return false;
        }
        let start = y * self.cols;
        self.cells[start..start + self.cols].iter().all(|&v| v != 0)
    }

    /// Check if a column is completely filled
    pub fn is_column_full(&self, x: usize) -> bool {
        if x >= self.cols {
            return false;
        }
        (0..self.rows).all(|y| self.cells[y * self.cols + x] != 0)
    }

    /// All full lines: rows top to bottom, then columns left to right
    pub fn full_lines(&self) -> Vec<Line> {
        let rows = (0..self.rows).filter(|&y| self.is_row_full(y)).map(Line::Row);
        let cols = (0..self.cols)
            .filter(|&x| self.is_column_full(x))
            .map(Line::Column);
        rows.chain(cols).collect()
    }

    /// Coordinates covered by a line
    pub fn line_cells(&self, line: Line) -> Vec<Coordinate> {
        match line {
            Line::Row(y) => (0..self.cols)
                .map(|x| Coordinate::new(x as i32, y as i32))
                .collect(),
            Line::Column(x) => (0..self.rows)
                .map(|y| Coordinate::new(x as i32, y as i32))
                .collect(),
        }
    }

    /// Empty every cell of a line
    pub fn clear_line(&mut self, line: Line) {
        for c in self.line_cells(line) {
            self.set(c.x, c.y, 0);
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Build a grid from rows of values, for tests and replays
    ///
    /// Returns None when the rows are ragged or a value is above `PIECE_COUNT`.
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        if rows.iter().flatten().any(|&v| v > PIECE_COUNT) {
            return None;
        }
        Some(Self {
            cols,
            rows: rows.len(),
            cells: rows.concat(),
            colour: 1,
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            let row = &self.cells[y * self.cols..(y + 1) * self.cols];
            let line: Vec<String> = row.iter().map(|v| format!("{v:>2}")).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the core rules, the engine and the
//! session runtime alike.
//!
//! # Board Dimensions
//!
//! The standard board is 5x5. Coordinates are `(x, y)` with `x` the column
//! (left to right) and `y` the row (top to bottom). Other sizes are allowed via
//! configuration; nothing in the rules assumes a square board except the
//! keyboard cursor clamp.
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_TURN_MS` | 12000 | Turn length at level 0 |
//! | `TURN_STEP_MS` | 500 | Turn shortened by this much per level |
//! | `MIN_TURN_MS` | 2500 | Turn length floor |
//!
//! # Examples
//!
//! ```
//! use tetrecs_types::{Command, Coordinate, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let cmd = Command::from_str("place 2 3").unwrap();
//! assert_eq!(cmd, Command::PlaceAt(Coordinate::new(2, 3)));
//!
//! assert_eq!(Command::from_str("q"), Some(Command::Rotate(3)));
//! assert_eq!((DEFAULT_COLS, DEFAULT_ROWS), (5, 5));
//! ```

use serde::Serialize;

/// Default board width in cells
pub const DEFAULT_COLS: usize = 5;

/// Default board height in cells
pub const DEFAULT_ROWS: usize = 5;

/// Number of shapes in the piece catalog (also the highest cell colour value)
pub const PIECE_COUNT: u8 = 15;

/// Lives at the start of a game. The game ends once lives drop below zero.
pub const STARTING_LIVES: i32 = 3;

/// Turn length at level 0
pub const BASE_TURN_MS: u64 = 12_000;

/// Reduction of the turn length per level
pub const TURN_STEP_MS: u64 = 500;

/// Shortest possible turn
pub const MIN_TURN_MS: u64 = 2_500;

/// Score needed per level
pub const LEVEL_THRESHOLD: u32 = 1_000;

/// Points per cleared block, before the multiplier
pub const POINTS_PER_BLOCK: u32 = 10;

/// Board coordinate. Signed so that shape cells hanging off the edge can be
/// expressed while checking a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The two piece slots an engine keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceSlot {
    /// The piece the player places this turn
    Current,
    /// The preview piece, promoted to current on the next turn
    Following,
}

impl PieceSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceSlot::Current => "current",
            PieceSlot::Following => "following",
        }
    }
}

/// Commands that can be applied to an engine
///
/// Only a placement (or a turn timeout) consumes a turn. Rotating, swapping and
/// cursor movement are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place the current piece centred on the given cell
    PlaceAt(Coordinate),
    /// Place the current piece centred on the keyboard cursor
    PlaceAtCursor,
    /// Rotate the current piece clockwise by this many quarter turns
    Rotate(u8),
    /// Exchange the current and following pieces
    Swap,
    /// Move the keyboard cursor by a step on each axis
    MoveCursor { dx: i32, dy: i32 },
    /// End the game from outside
    Stop,
}

impl Command {
    /// Parse a command from its text form (case-insensitive)
    ///
    /// Accepted forms: `place <x> <y>`, `drop` | `x`, `rotate [n]`, `e` (one turn),
    /// `q` (three turns), `swap` | `r`, `move <dx> <dy>`, `up` | `w`, `down` | `s`,
    /// `left` | `a`, `right` | `d`, `quit` | `stop` | `esc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrecs_types::Command;
    ///
    /// assert_eq!(Command::from_str("rotate"), Some(Command::Rotate(1)));
    /// assert_eq!(Command::from_str("MOVE -1 0"), Some(Command::MoveCursor { dx: -1, dy: 0 }));
    /// assert_eq!(Command::from_str("place two 3"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let mut parts = lower.split_whitespace();
        let keyword = parts.next()?;

        let cmd = match keyword {
            "place" => {
                let x = parts.next()?.parse().ok()?;
                let y = parts.next()?.parse().ok()?;
                Command::PlaceAt(Coordinate::new(x, y))
            }
            "drop" | "x" | "enter" => Command::PlaceAtCursor,
            "rotate" => match parts.next() {
                Some(n) => Command::Rotate(n.parse().ok()?),
                None => Command::Rotate(1),
            },
            "e" | "]" => Command::Rotate(1),
            "q" | "[" => Command::Rotate(3),
            "swap" | "r" => Command::Swap,
            "move" => {
                let dx = parts.next()?.parse().ok()?;
                let dy = parts.next()?.parse().ok()?;
                Command::MoveCursor { dx, dy }
            }
            "up" | "w" => Command::MoveCursor { dx: 0, dy: -1 },
            "down" | "s" => Command::MoveCursor { dx: 0, dy: 1 },
            "left" | "a" => Command::MoveCursor { dx: -1, dy: 0 },
            "right" | "d" => Command::MoveCursor { dx: 1, dy: 0 },
            "quit" | "stop" | "esc" => Command::Stop,
            _ => return None,
        };

        // Trailing garbage makes the whole line invalid.
        if parts.next().is_some() {
            return None;
        }
        Some(cmd)
    }

    /// Whether applying this command can consume a turn
    pub fn consumes_turn(&self) -> bool {
        matches!(self, Command::PlaceAt(_) | Command::PlaceAtCursor)
    }
}

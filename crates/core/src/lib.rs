//! Core game rules - pure, deterministic, and testable
//!
//! This crate holds the rules of the block-placement game with **no** timers,
//! channels or I/O:
//!
//! - [`pieces`]: the fixed catalog of 15 shapes and their rotation
//! - [`grid`]: the board, placement checks, full-line detection and clearing
//! - [`scoring`]: line score, incremental level tracking, turn length per level
//! - [`rng`]: seeded uniform piece draws
//! - [`scores`]: the local high-score ledger format
//!
//! # Game Rules
//!
//! - A piece is placed by centring its 3x3 window on a cell; every filled shape
//!   cell must land on an empty board cell.
//! - After each placement every full row and every full column is cleared. Each
//!   one scores `cells * 10 * multiplier`.
//! - The multiplier grows by one per clearing placement and drops back to 1 on a
//!   placement that clears nothing.
//! - A level is gained for every 1000 points.
//!
//! # Example
//!
//! ```
//! use tetrecs_core::{line_score, Grid, Piece, PieceKind};
//!
//! let mut grid = Grid::new(5, 5);
//! let line = Piece::new(PieceKind::Line).rotated(1);
//!
//! // Fill the two ends of row 2, then close it with a horizontal line.
//! grid.set(0, 2, 1);
//! grid.set(4, 2, 1);
//! assert!(grid.can_place(&line, 2, 2));
//! grid.place(&line, 2, 2).unwrap();
//!
//! let lines = grid.full_lines();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(line_score(1, 5, 1), 50);
//! ```

pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scores;
pub mod scoring;

pub use tetrecs_types as types;

// Re-export commonly used types for convenience
pub use grid::{Grid, Line, PlacementError};
pub use pieces::{Piece, PieceKind};
pub use rng::{PieceDraw, SimpleRng};
pub use scores::{LedgerError, ScoreEntry, ScoreLedger};
pub use scoring::{line_score, turn_delay_ms, LevelTracker};

//! Game configuration
//!
//! Defaults match the standard 5x5 game. `from_env` lets a launcher override
//! them without code changes.

use crate::types::{DEFAULT_COLS, DEFAULT_ROWS, STARTING_LIVES};

/// Largest board side accepted from the environment
pub const MAX_BOARD_SIDE: usize = 256;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub cols: usize,
    pub rows: usize,
    pub lives: i32,
    /// Seed for local piece draws. None picks one from the clock.
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            lives: STARTING_LIVES,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables
    ///
    /// - `TETRECS_COLS` / `TETRECS_ROWS`: board size, `1..=MAX_BOARD_SIDE`
    /// - `TETRECS_LIVES`: starting lives
    /// - `TETRECS_SEED`: piece draw seed
    ///
    /// Missing or unparseable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with a custom variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<i64>().ok());

        let size = |key: &str, default: usize| {
            parse(key)
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| (1..=MAX_BOARD_SIDE).contains(v))
                .unwrap_or(default)
        };

        Self {
            cols: size("TETRECS_COLS", defaults.cols),
            rows: size("TETRECS_ROWS", defaults.rows),
            lives: parse("TETRECS_LIVES")
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(defaults.lives),
            seed: parse("TETRECS_SEED").and_then(|v| u32::try_from(v).ok()),
        }
    }

    /// Seed to use for local draws, falling back to the wall clock
    pub fn seed_or_clock(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}

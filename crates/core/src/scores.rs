//! High-score ledger
//!
//! Text format: one `name:score` entry per line. The ledger keeps entries sorted
//! by score, highest first, and renders at most `MAX_ENTRIES` of them.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

/// Entries kept when rendering
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Line has no `:` separator
    MissingSeparator { line: usize },
    /// Score part is not a non-negative integer
    BadScore { line: usize, value: String },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::MissingSeparator { line } => {
                write!(f, "line {line}: expected `name:score`")
            }
            LedgerError::BadScore { line, value } => {
                write!(f, "line {line}: `{value}` is not a score")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, highest score first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Whether `score` would be a new high score
    pub fn beats_best(&self, score: u32) -> bool {
        self.best().map_or(true, |best| score > best.score)
    }

    /// Add an entry, keeping the order. Equal scores keep insertion order.
    pub fn insert(&mut self, name: impl Into<String>, score: u32) {
        let pos = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(
            pos,
            ScoreEntry {
                name: name.into(),
                score,
            },
        );
    }

    /// Render the top entries in file format
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.entries.iter().take(MAX_ENTRIES) {
            out.push_str(&entry.name);
            out.push(':');
            out.push_str(&entry.score.to_string());
            out.push('\n');
        }
        out
    }
}

impl FromStr for ScoreLedger {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ledger = ScoreLedger::new();
        for (i, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            // Names may contain ':', the score is after the last one.
            let (name, score) = line
                .rsplit_once(':')
                .ok_or(LedgerError::MissingSeparator { line: i + 1 })?;
            let score = score.trim().parse().map_err(|_| LedgerError::BadScore {
                line: i + 1,
                value: score.to_string(),
            })?;
            ledger.insert(name.trim(), score);
        }
        debug!(entries = ledger.entries.len(), "loaded score ledger");
        Ok(ledger)
    }
}

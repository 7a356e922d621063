//! Protocol module - the line-oriented text protocol of a remote session
//!
//! One message per line, keyword first:
//!
//! - server -> game: `PIECE <index>` delivers one catalog piece. Every other
//!   keyword belongs to the lobby or chat and is parked.
//! - game -> server: `PIECE` asks for one piece, `SCORE <n>`, `LIVES <n>`, `DIE`.
//!
//! Text can arrive split at any byte. [`LineDecoder`] buffers the partial tail
//! until its newline shows up.

use std::fmt;

use crate::core::Piece;

/// A parsed inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Piece(Piece),
    /// Any keyword the game does not act on
    Other { keyword: String },
}

/// An outbound line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    RequestPiece,
    Score(u32),
    Lives(i32),
    Die,
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::RequestPiece => write!(f, "PIECE"),
            ClientMessage::Score(score) => write!(f, "SCORE {score}"),
            ClientMessage::Lives(lives) => write!(f, "LIVES {lives}"),
            ClientMessage::Die => write!(f, "DIE"),
        }
    }
}

/// Why an inbound line was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Empty,
    MissingField { keyword: &'static str },
    BadNumber { keyword: &'static str, value: String },
    UnknownPiece(u32),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Empty => write!(f, "empty message"),
            ProtocolError::MissingField { keyword } => write!(f, "{keyword} without a value"),
            ProtocolError::BadNumber { keyword, value } => {
                write!(f, "{keyword} value {value:?} is not a number")
            }
            ProtocolError::UnknownPiece(index) => write!(f, "no piece with index {index}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Parse one inbound line (without its newline)
pub fn parse_line(line: &str) -> Result<ServerMessage, ProtocolError> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(' ') {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword {
        "" => Err(ProtocolError::Empty),
        "PIECE" => {
            if rest.is_empty() {
                return Err(ProtocolError::MissingField { keyword: "PIECE" });
            }
            let index: u32 = rest.parse().map_err(|_| ProtocolError::BadNumber {
                keyword: "PIECE",
                value: rest.to_string(),
            })?;
            u8::try_from(index)
                .ok()
                .and_then(Piece::from_index)
                .map(ServerMessage::Piece)
                .ok_or(ProtocolError::UnknownPiece(index))
        }
        other => Ok(ServerMessage::Other {
            keyword: other.to_string(),
        }),
    }
}

/// Splits chunked text into complete lines
#[derive(Debug, Default, Clone)]
pub struct LineDecoder {
    buf: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, `\r` stripped
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buf.push_str(chunk);

        let Some(end) = self.buf.rfind('\n') else {
            return Vec::new();
        };
        let tail = self.buf.split_off(end + 1);
        let complete = std::mem::replace(&mut self.buf, tail);

        complete
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Text waiting for its newline
    pub fn pending(&self) -> &str {
        &self.buf
    }
}

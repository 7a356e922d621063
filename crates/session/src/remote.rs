//! Remote piece source
//!
//! Every request goes out as a `PIECE` line and the answer comes back later
//! through the session's inbound text. Score, lives and death are published on
//! the same outbound channel.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::Piece;
use crate::engine::PieceSource;
use crate::protocol::ClientMessage;

#[derive(Debug, Clone)]
pub struct RemotePieces {
    out: mpsc::UnboundedSender<ClientMessage>,
    requested: u64,
}

impl RemotePieces {
    pub fn new(out: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self { out, requested: 0 }
    }

    /// How many pieces were asked for so far
    pub fn requested(&self) -> u64 {
        self.requested
    }

    fn send(&self, message: ClientMessage) {
        debug!(%message, "sending");
        if self.out.send(message).is_err() {
            warn!(%message, "connection closed, message lost");
        }
    }
}

impl PieceSource for RemotePieces {
    fn request(&mut self) -> Option<Piece> {
        self.requested += 1;
        self.send(ClientMessage::RequestPiece);
        None
    }

    fn publish_score(&mut self, score: u32) {
        self.send(ClientMessage::Score(score));
    }

    fn publish_lives(&mut self, lives: i32) {
        self.send(ClientMessage::Lives(lives));
    }

    fn publish_death(&mut self) {
        self.send(ClientMessage::Die);
    }
}

//! Piece sources
//!
//! A source is asked for one piece per request. Local sources answer right away;
//! a remote source only forwards the request and the piece arrives later through
//! [`Engine::deliver`](crate::Engine::deliver).
//!
//! Sources also carry the outward publications of score, lives and death. Local
//! play has no audience, so the default implementations do nothing.

use std::collections::VecDeque;

use crate::core::{Piece, PieceDraw};

pub trait PieceSource {
    /// Ask for one more piece. `None` means it will be delivered later.
    fn request(&mut self) -> Option<Piece>;

    /// Publish the score after a successful placement
    fn publish_score(&mut self, _score: u32) {}

    /// Publish the lives left after a lost turn
    fn publish_lives(&mut self, _lives: i32) {}

    /// Announce that this player is out, before the engine stops
    fn publish_death(&mut self) {}
}

impl<T: PieceSource + ?Sized> PieceSource for &mut T {
    fn request(&mut self) -> Option<Piece> {
        (**self).request()
    }

    fn publish_score(&mut self, score: u32) {
        (**self).publish_score(score);
    }

    fn publish_lives(&mut self, lives: i32) {
        (**self).publish_lives(lives);
    }

    fn publish_death(&mut self) {
        (**self).publish_death();
    }
}

/// Single-player source: uniform draws from the catalog
#[derive(Debug, Clone, Default)]
pub struct LocalPieces {
    draw: PieceDraw,
}

impl LocalPieces {
    pub fn seeded(seed: u32) -> Self {
        Self {
            draw: PieceDraw::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.draw.seed()
    }
}

impl PieceSource for LocalPieces {
    fn request(&mut self) -> Option<Piece> {
        Some(Piece::new(self.draw.draw()))
    }
}

/// Replays a fixed sequence of pieces, then runs dry
#[derive(Debug, Clone, Default)]
pub struct ScriptedPieces {
    queue: VecDeque<Piece>,
}

impl ScriptedPieces {
    pub fn new(pieces: impl IntoIterator<Item = Piece>) -> Self {
        Self {
            queue: pieces.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl PieceSource for ScriptedPieces {
    fn request(&mut self) -> Option<Piece> {
        self.queue.pop_front()
    }
}

//! Notifications emitted to the presentation layer, and the sinks that receive them

use serde::Serialize;

use crate::core::{Line, Piece, PlacementError};
use crate::types::{Coordinate, PieceSlot};

/// Something the presentation layer should render
///
/// Serialized as a JSON object tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    PieceChanged { slot: PieceSlot, piece: Piece },
    LineCleared { line: Line, cells: Vec<Coordinate> },
    ScoreChanged { score: u32 },
    LevelChanged { level: u32 },
    LivesChanged { lives: i32 },
    MultiplierChanged { multiplier: u32 },
    /// A new turn started; it expires after `delay_ms`
    TurnDeadline { turn: u64, delay_ms: u64 },
    CursorMoved { at: Coordinate },
    PlacementRejected { at: Coordinate, reason: PlacementError },
    /// The running score passed the stored high score; sent once per game
    HighScoreBeaten { score: u32 },
    GameOver { score: u32 },
}

/// Receiver of engine notifications
///
/// Sinks are fire-and-forget: the engine never waits on them.
pub trait EventSink {
    fn notify(&mut self, notification: Notification);
}

impl EventSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F: FnMut(Notification)> EventSink for FnSink<F> {
    fn notify(&mut self, notification: Notification) {
        (self.0)(notification);
    }
}

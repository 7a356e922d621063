//! Turn clock - the per-turn countdown
//!
//! The engine owns one clock and re-arms it at the start of every turn. When the
//! delay elapses the owner must call
//! [`Engine::on_turn_expired`](crate::Engine::on_turn_expired) with the turn id
//! the clock was armed for. Expiries for an older turn are ignored by the engine,
//! so a cancel that loses the race against a firing timer is harmless.

use std::time::Duration;

/// Turn id, increases every time the clock is re-armed
pub type TurnId = u64;

/// A cancellable single-shot timer
pub trait TurnClock {
    /// Schedule an expiry for `turn` after `delay`, replacing any pending one
    fn arm(&mut self, turn: TurnId, delay: Duration);

    /// Drop the pending expiry, if any
    fn cancel(&mut self);
}

impl<T: TurnClock + ?Sized> TurnClock for &mut T {
    fn arm(&mut self, turn: TurnId, delay: Duration) {
        (**self).arm(turn, delay);
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }
}

/// Clock driven by hand
///
/// Records what the engine asked for; the caller decides when time passes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualClock {
    pending: Option<(TurnId, Duration)>,
    armed: u64,
    cancelled: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The armed turn and its delay
    pub fn pending(&self) -> Option<(TurnId, Duration)> {
        self.pending
    }

    /// Take the pending expiry, as if its delay had elapsed
    pub fn fire(&mut self) -> Option<TurnId> {
        self.pending.take().map(|(turn, _)| turn)
    }

    /// How many times the clock was armed
    pub fn armed(&self) -> u64 {
        self.armed
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl TurnClock for ManualClock {
    fn arm(&mut self, turn: TurnId, delay: Duration) {
        self.pending = Some((turn, delay));
        self.armed += 1;
    }

    fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.cancelled += 1;
        }
    }
}

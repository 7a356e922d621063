//! Tokio turn clock
//!
//! Each arm spawns one sleeping task that posts [`Input::TurnExpired`] back into
//! the session queue. Cancel aborts the task. The clock only holds a weak sender
//! so a pending timer never keeps a finished session alive.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::engine::{TurnClock, TurnId};
use crate::runtime::Input;

#[derive(Debug)]
pub struct TokioClock {
    tx: mpsc::WeakUnboundedSender<Input>,
    timer: Option<JoinHandle<()>>,
}

impl TokioClock {
    pub fn new(tx: mpsc::WeakUnboundedSender<Input>) -> Self {
        Self { tx, timer: None }
    }

    /// Whether a timer is currently sleeping
    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl TurnClock for TokioClock {
    fn arm(&mut self, turn: TurnId, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                trace!(turn, "turn timer fired");
                let _ = tx.send(Input::TurnExpired(turn));
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        self.cancel();
    }
}

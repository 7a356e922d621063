//! Engine - the turn state machine
//!
//! One engine owns a grid, the two piece slots and the score state. It is
//! generic over where pieces come from ([`PieceSource`]), how turns are timed
//! ([`TurnClock`]) and who hears about changes ([`EventSink`]). Single-player and
//! multiplayer differ only in the source they are built with.
//!
//! # Turn lifecycle
//!
//! ```text
//! NotStarted ──start──▶ AwaitingPlacement ──place / expire──▶ AwaitingPlacement
//!                              │                                     │
//!                              └──stop──▶ Stopped      lives < 0 ──▶ GameOver
//! ```
//!
//! A turn ends either with a successful placement or with the clock expiring.
//! Both advance the pieces and re-arm the clock; an expiry also costs a life and
//! resets the multiplier. Rejected placements, rotations, swaps and cursor moves
//! never touch the clock.
//!
//! The engine performs no locking. All calls must come from one owner, which is
//! expected to serialize commands, deliveries and clock expiries.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{TurnClock, TurnId};
use crate::config::GameConfig;
use crate::core::{line_score, turn_delay_ms, Grid, LevelTracker, Piece, PlacementError};
use crate::events::{EventSink, Notification};
use crate::source::{LocalPieces, PieceSource};
use crate::types::{Command, Coordinate, PieceSlot};

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Built, pieces requested, clock not armed yet
    NotStarted,
    /// A turn is running
    AwaitingPlacement,
    /// Lives ran out
    GameOver,
    /// Stopped from outside
    Stopped,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Stopped)
    }
}

/// Why a command was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    NotStarted,
    /// The game is over or was stopped
    Terminal(Phase),
    /// No current piece yet (remote play before the first delivery)
    NoCurrentPiece,
    NoFollowingPiece,
    Placement(PlacementError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotStarted => write!(f, "game has not started"),
            CommandError::Terminal(phase) => write!(f, "game is no longer running ({phase:?})"),
            CommandError::NoCurrentPiece => write!(f, "no current piece yet"),
            CommandError::NoFollowingPiece => write!(f, "no following piece yet"),
            CommandError::Placement(e) => write!(f, "piece does not fit: {e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<PlacementError> for CommandError {
    fn from(e: PlacementError) -> Self {
        CommandError::Placement(e)
    }
}

/// Final figures of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub score: u32,
    pub level: u32,
    pub lives: i32,
    pub phase: Phase,
}

/// Single-player engine
pub type LocalEngine<C, N> = Engine<LocalPieces, C, N>;

/// "Does this score beat the stored high score?"
pub type HighScoreQuery = Box<dyn Fn(u32) -> bool + Send>;

pub struct Engine<S, C, N> {
    grid: Grid,
    source: S,
    clock: C,
    sink: N,
    current: Option<Piece>,
    following: Option<Piece>,
    score: u32,
    levels: LevelTracker,
    lives: i32,
    multiplier: u32,
    cursor: Coordinate,
    /// Id of the running turn; bumped on every re-arm and on stop
    turn: TurnId,
    phase: Phase,
    /// Slot the next delivered piece goes to. Flips to Following after the
    /// first delivery and stays there.
    pending_slot: PieceSlot,
    high_score: Option<HighScoreQuery>,
    high_score_beaten: bool,
}

impl<C: TurnClock, N: EventSink> LocalEngine<C, N> {
    /// Single-player engine seeded from the config (or the wall clock)
    pub fn local(config: &GameConfig, clock: C, sink: N) -> Self {
        Engine::new(config, LocalPieces::seeded(config.seed_or_clock()), clock, sink)
    }
}

impl<S: PieceSource, C: TurnClock, N: EventSink> Engine<S, C, N> {
    /// Build an engine and ask the source for the first two pieces
    pub fn new(config: &GameConfig, source: S, clock: C, sink: N) -> Self {
        let mut engine = Self {
            grid: Grid::new(config.cols, config.rows),
            source,
            clock,
            sink,
            current: None,
            following: None,
            score: 0,
            levels: LevelTracker::new(),
            lives: config.lives,
            multiplier: 1,
            cursor: Coordinate::default(),
            turn: 0,
            phase: Phase::NotStarted,
            pending_slot: PieceSlot::Current,
            high_score: None,
            high_score_beaten: false,
        };

        for _ in 0..2 {
            if let Some(piece) = engine.source.request() {
                engine.fill(piece);
            }
        }
        engine
    }

    /// Replace the board, for replays and tests
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    /// Ask `query` after every line clear whether the running score beats the
    /// stored high score
    pub fn with_high_score(mut self, query: impl Fn(u32) -> bool + Send + 'static) -> Self {
        self.set_high_score(Box::new(query));
        self
    }

    pub fn set_high_score(&mut self, query: HighScoreQuery) {
        self.high_score = Some(query);
    }

    /// Start the first turn
    pub fn start(&mut self) {
        if self.phase != Phase::NotStarted {
            return;
        }
        info!(
            cols = self.grid.cols(),
            rows = self.grid.rows(),
            lives = self.lives,
            "starting game"
        );
        self.phase = Phase::AwaitingPlacement;
        self.announce_pieces();
        self.rearm();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.levels.level()
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn following(&self) -> Option<Piece> {
        self.following
    }

    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    pub fn turn(&self) -> TurnId {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Slot the next remote delivery will fill
    pub fn pending_slot(&self) -> PieceSlot {
        self.pending_slot
    }

    pub fn high_score_beaten(&self) -> bool {
        self.high_score_beaten
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::AwaitingPlacement
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            level: self.levels.level(),
            lives: self.lives,
            phase: self.phase,
        }
    }

    /// Apply one command
    pub fn handle(&mut self, command: Command) -> Result<(), CommandError> {
        let result = match command {
            Command::PlaceAt(at) => self.place_at(at.x, at.y),
            Command::PlaceAtCursor => self.place_at(self.cursor.x, self.cursor.y),
            Command::Rotate(quarter_turns) => self.rotate(quarter_turns),
            Command::Swap => self.swap(),
            Command::MoveCursor { dx, dy } => self.move_cursor(dx, dy),
            Command::Stop => {
                self.stop();
                Ok(())
            }
        };
        if let Err(e) = &result {
            debug!(?command, error = %e, "command not applied");
        }
        result
    }

    fn ensure_running(&self) -> Result<(), CommandError> {
        match self.phase {
            Phase::AwaitingPlacement => Ok(()),
            Phase::NotStarted => Err(CommandError::NotStarted),
            phase => Err(CommandError::Terminal(phase)),
        }
    }

    /// Place the current piece centred on (x, y) and end the turn
    pub fn place_at(&mut self, x: i32, y: i32) -> Result<(), CommandError> {
        self.ensure_running()?;
        let piece = self.current.ok_or(CommandError::NoCurrentPiece)?;

        if let Err(reason) = self.grid.place(&piece, x, y) {
            self.sink.notify(Notification::PlacementRejected {
                at: Coordinate::new(x, y),
                reason,
            });
            return Err(reason.into());
        }
        debug!(%piece, x, y, "placed piece");
        self.current = None;

        let cleared = self.resolve_lines();
        self.set_multiplier(if cleared > 0 { self.multiplier + 1 } else { 1 });
        self.source.publish_score(self.score);

        self.advance();
        self.rearm();
        self.announce_pieces();
        Ok(())
    }

    /// Score and clear every full line. Returns how many were cleared.
    fn resolve_lines(&mut self) -> usize {
        let lines = self.grid.full_lines();

        for &line in &lines {
            let cells = self.grid.line_cells(line);
            let delta = line_score(1, cells.len() as u32, self.multiplier);
            self.score = self.score.saturating_add(delta);
            self.sink.notify(Notification::ScoreChanged { score: self.score });
            self.check_high_score();

            if self.levels.observe(self.score) > 0 {
                info!(level = self.levels.level(), "level up");
                self.sink.notify(Notification::LevelChanged {
                    level: self.levels.level(),
                });
            }

            info!(?line, delta, multiplier = self.multiplier, "cleared line");
            self.sink.notify(Notification::LineCleared { line, cells });
        }

        // Clear only after detection so crossing lines both count.
        for &line in &lines {
            self.grid.clear_line(line);
        }
        lines.len()
    }

    /// Rotate the current piece clockwise. Free: the turn keeps running.
    pub fn rotate(&mut self, quarter_turns: u8) -> Result<(), CommandError> {
        self.ensure_running()?;
        let piece = self.current.ok_or(CommandError::NoCurrentPiece)?;
        let rotated = piece.rotated(quarter_turns);
        self.current = Some(rotated);
        self.sink.notify(Notification::PieceChanged {
            slot: PieceSlot::Current,
            piece: rotated,
        });
        Ok(())
    }

    /// Exchange current and following. Free: the turn keeps running.
    pub fn swap(&mut self) -> Result<(), CommandError> {
        self.ensure_running()?;
        if self.current.is_none() {
            return Err(CommandError::NoCurrentPiece);
        }
        if self.following.is_none() {
            return Err(CommandError::NoFollowingPiece);
        }
        std::mem::swap(&mut self.current, &mut self.following);
        self.announce_pieces();
        Ok(())
    }

    /// Move the keyboard cursor, clamped to the board
    pub fn move_cursor(&mut self, dx: i32, dy: i32) -> Result<(), CommandError> {
        self.ensure_running()?;
        let max = self.grid.cols().min(self.grid.rows()).saturating_sub(1) as i32;
        self.cursor = Coordinate::new(
            self.cursor.x.saturating_add(dx).clamp(0, max),
            self.cursor.y.saturating_add(dy).clamp(0, max),
        );
        self.sink.notify(Notification::CursorMoved { at: self.cursor });
        Ok(())
    }

    /// End the game from outside. Cancels the clock; later expiries are ignored.
    pub fn stop(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.clock.cancel();
        self.turn += 1;
        self.phase = Phase::Stopped;
        info!(score = self.score, "game stopped");
    }

    /// The clock armed for `turn` ran out
    ///
    /// Returns false when the expiry is stale: it belongs to an earlier turn or
    /// the engine is not waiting for a placement any more.
    pub fn on_turn_expired(&mut self, turn: TurnId) -> bool {
        if self.phase != Phase::AwaitingPlacement || turn != self.turn {
            debug!(turn, current = self.turn, phase = ?self.phase, "ignoring stale expiry");
            return false;
        }

        self.set_multiplier(1);
        self.lives -= 1;
        info!(turn, lives = self.lives, "turn expired");
        self.sink.notify(Notification::LivesChanged { lives: self.lives });
        self.source.publish_lives(self.lives);

        if let Some(piece) = self.current.take() {
            debug!(%piece, "discarded piece");
        }

        self.advance();
        self.rearm();
        if self.phase == Phase::AwaitingPlacement {
            self.announce_pieces();
        }
        true
    }

    /// A piece requested earlier has arrived
    ///
    /// The first delivery fills current, every later one fills following,
    /// whatever the slots hold. Returns the slot it went to, or None once the
    /// game has ended.
    pub fn deliver(&mut self, piece: Piece) -> Option<PieceSlot> {
        if self.phase.is_terminal() {
            debug!(%piece, "ignoring delivery after the game ended");
            return None;
        }

        let slot = self.pending_slot;
        let target = match slot {
            PieceSlot::Current => &mut self.current,
            PieceSlot::Following => &mut self.following,
        };
        if let Some(replaced) = target.replace(piece) {
            warn!(%replaced, %piece, slot = slot.as_str(), "delivery replaced a waiting piece");
        }
        self.pending_slot = PieceSlot::Following;

        debug!(%piece, slot = slot.as_str(), "piece delivered");
        self.sink.notify(Notification::PieceChanged { slot, piece });
        Some(slot)
    }

    fn check_high_score(&mut self) {
        if self.high_score_beaten {
            return;
        }
        let Some(query) = &self.high_score else {
            return;
        };
        if query(self.score) {
            self.high_score_beaten = true;
            info!(score = self.score, "high score beaten");
            self.sink
                .notify(Notification::HighScoreBeaten { score: self.score });
        }
    }

    /// Slot a piece from a synchronous source into the first empty slot
    fn fill(&mut self, piece: Piece) -> Option<PieceSlot> {
        if self.current.is_none() {
            self.current = Some(piece);
            Some(PieceSlot::Current)
        } else if self.following.is_none() {
            self.following = Some(piece);
            Some(PieceSlot::Following)
        } else {
            None
        }
    }

    /// current <- following, then request a new following
    fn advance(&mut self) {
        self.current = self.following.take();
        if let Some(piece) = self.source.request() {
            self.fill(piece);
        }
    }

    /// Start the next turn, or end the game when lives ran out
    fn rearm(&mut self) {
        self.clock.cancel();

        if self.lives < 0 {
            self.phase = Phase::GameOver;
            self.turn += 1;
            self.source.publish_death();
            info!(score = self.score, level = self.levels.level(), "game over");
            self.sink.notify(Notification::GameOver { score: self.score });
            return;
        }

        self.turn += 1;
        let delay_ms = turn_delay_ms(self.levels.level());
        self.clock.arm(self.turn, Duration::from_millis(delay_ms));
        debug!(turn = self.turn, delay_ms, "turn armed");
        self.sink.notify(Notification::TurnDeadline {
            turn: self.turn,
            delay_ms,
        });
    }

    fn set_multiplier(&mut self, multiplier: u32) {
        if multiplier != self.multiplier {
            self.multiplier = multiplier;
            self.sink
                .notify(Notification::MultiplierChanged { multiplier });
        }
    }

    fn announce_pieces(&mut self) {
        if let Some(piece) = self.current {
            self.sink.notify(Notification::PieceChanged {
                slot: PieceSlot::Current,
                piece,
            });
        }
        if let Some(piece) = self.following {
            self.sink.notify(Notification::PieceChanged {
                slot: PieceSlot::Following,
                piece,
            });
        }
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

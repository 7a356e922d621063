//! Session runtime - the single dispatch point for one engine
//!
//! Commands, inbound protocol text and timer expiries all travel through one
//! unbounded queue and are applied by one task, one at a time. The engine never
//! sees two inputs at once, so it needs no locking.

use anyhow::bail;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::clock::TokioClock;
use crate::engine::{
    Engine, EventSink, GameConfig, GameSummary, HighScoreQuery, Notification, PieceSource, TurnId,
};
use crate::protocol::{parse_line, ClientMessage, LineDecoder, ServerMessage};
use crate::remote::RemotePieces;
use crate::types::Command;

/// One entry of the session queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Raw text from the remote connection, possibly a partial line
    Text(String),
    TurnExpired(TurnId),
}

/// Sending side of a session. Cheap to clone.
///
/// Dropping every handle stops the game.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Input>,
}

impl SessionHandle {
    /// Queue a command. Returns false once the session has ended.
    pub fn command(&self, command: Command) -> bool {
        self.tx.send(Input::Command(command)).is_ok()
    }

    /// Queue inbound protocol text
    pub fn text(&self, chunk: impl Into<String>) -> bool {
        self.tx.send(Input::Text(chunk.into())).is_ok()
    }

    pub fn stop(&self) -> bool {
        self.command(Command::Stop)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Notification sink backed by an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink(pub mpsc::UnboundedSender<Notification>);

impl EventSink for ChannelSink {
    fn notify(&mut self, notification: Notification) {
        // Nobody listening is fine: the game keeps running headless.
        let _ = self.0.send(notification);
    }
}

/// The receiving side of a session, consumed by one of the `run_*` methods
pub struct Session {
    config: GameConfig,
    rx: mpsc::UnboundedReceiver<Input>,
    weak: mpsc::WeakUnboundedSender<Input>,
    notifications: mpsc::UnboundedSender<Notification>,
    high_score: Option<HighScoreQuery>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("high_score", &self.high_score.is_some())
            .finish_non_exhaustive()
    }
}

/// Create a session and its handle
pub fn session(
    config: GameConfig,
    notifications: mpsc::UnboundedSender<Notification>,
) -> (SessionHandle, Session) {
    let (tx, rx) = mpsc::unbounded_channel();
    let weak = tx.downgrade();
    (
        SessionHandle { tx },
        Session {
            config,
            rx,
            weak,
            notifications,
            high_score: None,
        },
    )
}

impl Session {
    /// Ask `query` whether a score beats the stored high score
    ///
    /// The engine sends `HighScoreBeaten` the first time it answers yes.
    pub fn with_high_score(mut self, query: impl Fn(u32) -> bool + Send + 'static) -> Self {
        self.high_score = Some(Box::new(query));
        self
    }

    /// Play a single-player game until it ends
    pub async fn run_local(mut self) -> anyhow::Result<GameSummary> {
        let clock = TokioClock::new(self.weak.clone());
        let sink = ChannelSink(self.notifications.clone());
        let mut engine = Engine::local(&self.config, clock, sink);
        if let Some(query) = self.high_score.take() {
            engine.set_high_score(query);
        }
        info!(seed = engine.source().seed(), "local session");

        engine.start();
        Ok(self.drive(&mut engine, false).await)
    }

    /// Play a game whose pieces come from a remote server
    ///
    /// Outbound protocol messages go to `out`; the server's replies must be fed
    /// back through [`SessionHandle::text`].
    pub async fn run_remote(
        mut self,
        out: mpsc::UnboundedSender<ClientMessage>,
    ) -> anyhow::Result<GameSummary> {
        if out.is_closed() {
            bail!("remote connection closed before the game started");
        }
        let clock = TokioClock::new(self.weak.clone());
        let sink = ChannelSink(self.notifications.clone());
        let mut engine = Engine::new(&self.config, RemotePieces::new(out), clock, sink);
        if let Some(query) = self.high_score.take() {
            engine.set_high_score(query);
        }
        info!("remote session");

        engine.start();
        Ok(self.drive(&mut engine, true).await)
    }

    async fn drive<S: PieceSource>(
        mut self,
        engine: &mut Engine<S, TokioClock, ChannelSink>,
        remote: bool,
    ) -> GameSummary {
        let mut decoder = LineDecoder::new();

        while !engine.phase().is_terminal() {
            let Some(input) = self.rx.recv().await else {
                debug!("all session handles dropped");
                engine.stop();
                break;
            };

            match input {
                Input::Command(command) => {
                    // Rejections are already logged and notified by the engine.
                    let _ = engine.handle(command);
                }
                Input::TurnExpired(turn) => {
                    engine.on_turn_expired(turn);
                }
                Input::Text(chunk) if remote => {
                    for line in decoder.push(&chunk) {
                        apply_line(engine, &line);
                    }
                }
                Input::Text(chunk) => {
                    warn!(len = chunk.len(), "ignoring protocol text in a local session");
                }
            }
        }

        let summary = engine.summary();
        info!(score = summary.score, level = summary.level, phase = ?summary.phase, "session ended");
        summary
    }
}

fn apply_line<S: PieceSource>(engine: &mut Engine<S, TokioClock, ChannelSink>, line: &str) {
    match parse_line(line) {
        Ok(ServerMessage::Piece(piece)) => {
            engine.deliver(piece);
        }
        Ok(ServerMessage::Other { keyword }) => {
            trace!(%keyword, "parked message");
        }
        Err(e) => {
            warn!(line, error = %e, "dropping malformed message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Phase;

    fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(item) = rx.try_recv() {
            out.push(item);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_game_ends_when_lives_run_out() {
        let (note_tx, mut note_rx) = mpsc::unbounded_channel();
        let config = GameConfig {
            lives: 1,
            seed: Some(7),
            ..GameConfig::default()
        };
        let (handle, session) = session(config, note_tx);

        // Nobody plays; paused time skips ahead to every deadline.
        let summary = session.run_local().await.unwrap();
        assert_eq!(summary.phase, Phase::GameOver);
        assert_eq!(summary.lives, -1);
        assert_eq!(summary.score, 0);
        assert!(handle.is_closed());

        let notes = drain(&mut note_rx);
        let lost: Vec<_> = notes
            .iter()
            .filter_map(|n| match n {
                Notification::LivesChanged { lives } => Some(*lives),
                _ => None,
            })
            .collect();
        assert_eq!(lost, vec![0, -1]);
        assert_eq!(notes.last(), Some(&Notification::GameOver { score: 0 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_local_game() {
        let (note_tx, _note_rx) = mpsc::unbounded_channel();
        let (handle, session) = session(GameConfig::default(), note_tx);

        handle.command(Command::Rotate(1));
        handle.stop();
        let summary = session.run_local().await.unwrap();
        assert_eq!(summary.phase, Phase::Stopped);
        assert_eq!(summary.lives, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_stops_game() {
        let (note_tx, _note_rx) = mpsc::unbounded_channel();
        let (handle, session) = session(GameConfig::default(), note_tx);
        drop(handle);

        let summary = session.run_local().await.unwrap();
        assert_eq!(summary.phase, Phase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_pieces_arrive_as_text() {
        let (note_tx, mut note_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let (handle, session) = session(GameConfig::default(), note_tx);

        handle.text("PIECE 3\nPIE");
        handle.text("CE 2\r\nMSG bob:hi\nPIECE x\n");
        handle.command(Command::PlaceAt(crate::types::Coordinate::new(0, 0)));
        handle.stop();

        let summary = session.run_remote(out_tx).await.unwrap();
        assert_eq!(summary.phase, Phase::Stopped);

        assert_eq!(
            drain(&mut out_rx),
            vec![
                ClientMessage::RequestPiece,
                ClientMessage::RequestPiece,
                ClientMessage::Score(0),
                ClientMessage::RequestPiece,
            ]
        );

        let rejected = drain(&mut note_rx)
            .into_iter()
            .any(|n| matches!(n, Notification::PlacementRejected { .. }));
        assert!(!rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_score_query_reaches_engine() {
        let (note_tx, mut note_rx) = mpsc::unbounded_channel();
        let (out_tx, _out_rx) = mpsc::unbounded_channel();
        let (handle, session) = session(GameConfig::default(), note_tx);
        let session = session.with_high_score(|score| score >= 50);

        // Five dots along the top row, one delivery ahead of each placement.
        handle.text("PIECE 3\nPIECE 3\n");
        for x in 0..5 {
            handle.command(Command::PlaceAt(crate::types::Coordinate::new(x, 0)));
            if x < 4 {
                handle.text("PIECE 3\n");
            }
        }
        handle.stop();

        let summary = session.run_remote(out_tx).await.unwrap();
        assert_eq!(summary.score, 50);

        let beaten: Vec<_> = drain(&mut note_rx)
            .into_iter()
            .filter(|n| matches!(n, Notification::HighScoreBeaten { .. }))
            .collect();
        assert_eq!(beaten, vec![Notification::HighScoreBeaten { score: 50 }]);
    }

    #[tokio::test]
    async fn test_remote_requires_open_connection() {
        let (note_tx, _note_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        drop(out_rx);
        let (_handle, session) = session(GameConfig::default(), note_tx);

        assert!(session.run_remote(out_tx).await.is_err());
    }
}

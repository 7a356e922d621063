//! Session layer - drives an engine from a tokio task
//!
//! - [`protocol`]: the line-oriented remote protocol and a chunk-tolerant line decoder
//! - [`remote`]: the piece source that asks a server for pieces
//! - [`clock`]: the tokio turn clock
//! - [`runtime`]: the single input queue and the loop that applies it
//!
//! # Example
//!
//! ```no_run
//! use tetrecs_session::{session, GameConfig};
//! use tetrecs_session::types::Command;
//! use tokio::sync::mpsc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let (notes_tx, mut notes_rx) = mpsc::unbounded_channel();
//! let (handle, session) = session(GameConfig::default(), notes_tx);
//!
//! tokio::spawn(async move {
//!     while let Some(note) = notes_rx.recv().await {
//!         println!("{note:?}");
//!     }
//! });
//!
//! handle.command(Command::PlaceAtCursor);
//! let summary = session.run_local().await?;
//! println!("final score {}", summary.score);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod protocol;
pub mod remote;
pub mod runtime;

pub use tetrecs_core as core;
pub use tetrecs_engine as engine;
pub use tetrecs_types as types;

pub use clock::TokioClock;
pub use engine::{GameConfig, GameSummary, Notification};
pub use protocol::{parse_line, ClientMessage, LineDecoder, ProtocolError, ServerMessage};
pub use remote::RemotePieces;
pub use runtime::{session, ChannelSink, Input, Session, SessionHandle};

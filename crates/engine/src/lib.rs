//! Game engine - turn state machine over the core rules
//!
//! The engine glues the pure rules in `tetrecs-core` to the outside world
//! through three seams:
//!
//! - [`PieceSource`]: where pieces come from (local draws, a script, a server)
//! - [`TurnClock`]: the per-turn countdown
//! - [`EventSink`]: notifications for whatever renders the game
//!
//! Nothing here spawns tasks or blocks. The session crate drives an engine from
//! a tokio task; tests drive it by hand with [`ManualClock`] and
//! [`ScriptedPieces`].
//!
//! # Example
//!
//! ```
//! use tetrecs_engine::{Engine, GameConfig, ManualClock, Notification, ScriptedPieces};
//! use tetrecs_engine::core::{Piece, PieceKind};
//!
//! let pieces = ScriptedPieces::new([PieceKind::Dot, PieceKind::Plus].map(Piece::new));
//! let mut engine = Engine::new(&GameConfig::default(), pieces, ManualClock::new(), Vec::new());
//! engine.start();
//!
//! engine.place_at(0, 0).unwrap();
//! assert_eq!(engine.current().map(|p| p.kind()), Some(PieceKind::Plus));
//!
//! // Let the turn run out.
//! let turn = engine.clock_mut().fire().unwrap();
//! assert!(engine.on_turn_expired(turn));
//! assert_eq!(engine.lives(), 2);
//! assert!(engine.sink().contains(&Notification::LivesChanged { lives: 2 }));
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod source;

pub use tetrecs_core as core;
pub use tetrecs_types as types;

pub use clock::{ManualClock, TurnClock, TurnId};
pub use config::{GameConfig, MAX_BOARD_SIDE};
pub use engine::{CommandError, Engine, GameSummary, HighScoreQuery, LocalEngine, Phase};
pub use events::{EventSink, FnSink, Notification, NullSink};
pub use source::{LocalPieces, PieceSource, ScriptedPieces};

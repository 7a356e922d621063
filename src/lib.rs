//! TetrECS (workspace facade crate).
//!
//! Exposes `tetrecs::{types,core,engine,session}` while the implementation lives
//! in dedicated crates under `crates/`.

pub use tetrecs_core as core;
pub use tetrecs_engine as engine;
pub use tetrecs_session as session;
pub use tetrecs_types as types;

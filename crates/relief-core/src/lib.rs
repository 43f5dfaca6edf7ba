//! Relief Core - Foundational types shared by every Relief crate
//!
//! This crate provides:
//! - `ReliefError` / `Result` - the error taxonomy for the whole session
//! - `ReliefConfig` - layered TOML configuration (defaults, global, local, env)
//! - `RoomBoundary` - the fixed rectangle the player walks inside

pub mod config;
mod error;
mod room;

pub use config::ReliefConfig;
pub use error::{ReliefError, Result};
pub use room::{Axis, RoomBoundary};

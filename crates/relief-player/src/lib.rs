//! Relief Player - the interactive session
//!
//! This crate provides the `ReliefApp` application handler, which walks the
//! player around a room whose walls are raised from live video frames.

mod app;
pub mod compass;
pub mod hud;

pub use app::ReliefApp;

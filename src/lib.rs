//! Grid-based snake game.
//!
//! The [`engine`] module holds the deterministic per-tick state machine and
//! has no I/O. Everything else (input mapping, cadence, rendering, terminal
//! lifecycle) is the driver side that feeds the engine and paints its
//! [`engine::Snapshot`].

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod food;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::GridSize;
use crate::snake::Cell;

/// Failures the engine reports to its caller.
///
/// Wall and self collisions are not errors; they end the run and show up
/// through [`crate::engine::GameEngine::is_running`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum EngineError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    InvalidBounds { width: u16, height: u16 },

    #[error(
        "start cell ({}, {}) lies outside the {}x{} grid",
        .start.x, .start.y, .bounds.width, .bounds.height
    )]
    StartOutOfBounds { start: Cell, bounds: GridSize },

    #[error("no free cell left for food")]
    NoFreeCellForFood,

    #[error("invalid board layout: {0}")]
    InvalidLayout(&'static str),
}

/// Failures while assembling a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error returned by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to initialise logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

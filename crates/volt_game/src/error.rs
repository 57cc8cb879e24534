use std::path::PathBuf;

use thiserror::Error;

/// Problems in authored level data. All of them are detected while loading,
/// never during play.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level JSON {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("level grid has no cells")]
    EmptyGrid,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("malformed id in tag '{tag}' at row {row}, column {col}")]
    MalformedTag { row: usize, col: usize, tag: String },
    #[error("unknown tag '{tag}' at row {row}, column {col}")]
    UnknownTag { row: usize, col: usize, tag: String },
    #[error("duplicate level id '{0}'")]
    DuplicateLevel(String),
    #[error("level '{level}' names unknown next level '{next}'")]
    UnknownNext { level: String, next: String },
    #[error("no level with id '{0}' is registered")]
    UnknownLevel(String),
    #[error("no levels configured")]
    NoLevels,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] winit::error::EventLoopError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[source] winit::error::OsError),
    #[error("failed to create pixel surface: {0}")]
    Surface(#[source] pixels::Error),
}

//! CLI error type.

use std::path::PathBuf;

use gridedit_lib::error::{ApiError, GridError};
use thiserror::Error;

use crate::script::ScriptError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("event {index}: {source}")]
    Script { index: usize, source: ScriptError },
    #[error("event {index}: {source}")]
    Event { index: usize, source: GridError },
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("client error: {0}")]
    Client(#[from] ApiError),
    #[error("logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

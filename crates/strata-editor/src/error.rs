use std::io;

use strata_io::PersistError;
use thiserror::Error;

/// Errors surfaced by the editor session and binary.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(serde_json::Error),

    #[error("could not serialize output: {0}")]
    Serialize(serde_json::Error),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("unknown demo '{0}'")]
    UnknownDemo(String),

    #[error("usage: {0}")]
    Usage(String),
}

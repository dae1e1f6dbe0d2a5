use std::io;

use thiserror::Error;

/// Errors raised while reading or writing worlds.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{0}' does not exist in the database")]
    NotFound(String),

    #[error("no database is open under the label '{0}'")]
    UnknownDatabase(String),

    #[error("'{0}' is not a valid file name")]
    InvalidFilename(String),

    #[error("bad arguments for {method}: {message}")]
    BadArguments { method: String, message: String },
}

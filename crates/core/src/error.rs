//! Error types for ossync-core

use thiserror::Error;

/// Errors raised while preparing or performing uploads
#[derive(Error, Debug)]
pub enum Error {
    /// Local filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command-line configuration (source directory, endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local path that cannot be turned into an object key
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The storage service rejected the credentials or the request signature
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport failures and service-side errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    General(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match err.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::General(format!("filesystem loop detected at {path}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

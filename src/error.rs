//! Error types returned at the boundaries of the core (parsing, pattern files, I/O)

use std::fmt;
use std::io;

/// Errors that can be surfaced across the crate's public API
#[derive(Debug)]
pub enum Error {
    /// The AAG text did not conform to the format described in the README
    Parse(String),
    /// A simulation pattern file had a line of the wrong length or with invalid characters
    PatternFormat(String),
    /// Failure reading or writing a file
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(msg) => write!(f, "parse error: {msg}"),
            Error::PatternFormat(msg) => write!(f, "pattern format error: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

/// Convenience alias for results returned by the core
pub type Result<T> = std::result::Result<T, Error>;

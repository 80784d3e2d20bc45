//! Unified error type.

use std::fmt;

/// The error type returned by middleman's fallible operations.
///
/// Application-level failures (404, 500, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding a listener, accepting a connection, or
/// wiring an invalid route-group configuration.
#[derive(Debug)]
pub enum Error {
    /// Listener or connection I/O failure.
    Io(std::io::Error),
    /// Route-group configuration rejected at startup.
    Group(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Group(msg) => write!(f, "route group: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Group(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

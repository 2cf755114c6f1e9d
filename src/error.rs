use std::io;

use thiserror::Error;

/// Boxed error raised by user-supplied filter code
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All error types for byline
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("record {record} is not valid UTF-8: {source}")]
    Utf8 {
        record: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("record exceeds the maximum length of {limit} bytes")]
    RecordTooLong { limit: usize },

    #[error("filter error: {0}")]
    Filter(#[source] BoxError),
}

impl Error {
    pub fn filter(err: impl Into<BoxError>) -> Self {
        Self::Filter(err.into())
    }

    /// Convert into an `io::Error` for the `Read` surface.
    ///
    /// Errors from the wrapped source come back out unchanged.
    pub fn into_io(self) -> io::Error {
        match self {
            Self::Io(err) => err,
            other => io::Error::other(other),
        }
    }
}

/// Result type alias for byline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Control value returned by a filter instead of a transformed record
#[derive(Debug)]
pub enum Signal {
    /// Drop the current record and keep streaming
    Omit,
    /// Finish the stream cleanly, dropping the current record
    Stop,
    /// Fail the stream with this error
    Fail(Error),
}

impl Signal {
    pub fn fail(err: impl Into<BoxError>) -> Self {
        Self::Fail(Error::filter(err))
    }
}

impl From<Error> for Signal {
    fn from(err: Error) -> Self {
        Self::Fail(err)
    }
}

impl From<io::Error> for Signal {
    fn from(err: io::Error) -> Self {
        Self::Fail(Error::Io(err))
    }
}

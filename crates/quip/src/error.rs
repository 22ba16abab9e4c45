//! Error types for response decoration.

use thiserror::Error;

/// Result type alias for terminal response operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while finalizing a response.
///
/// Transport failures from the host sink are carried through as
/// [`Error::Io`] without translation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("redirect {code} requires a location")]
    MissingLocation { code: u16 },

    #[error("invalid JSONP callback name: {0:?}")]
    InvalidCallback(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}

use thiserror::Error;

/// Errors surfaced by the ledger.
///
/// There are deliberately only two kinds: bad input from the caller, and a
/// storage layer that could not be reached. Missing records are never an
/// error — "no warnings" and "no active restriction" are valid steady states
/// and come back as empty results.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

impl Error {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

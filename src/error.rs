use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

/// Error taxonomy for a load cycle. Transport and protocol failures come
/// from the remote source, store failures from the local database. Every
/// error is terminal for the load that produced it; retry is always an
/// explicit follow-up call.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("store error: {0}")]
    Store(#[from] tokio_rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        // A response we received but could not decode is a contract
        // violation, not a connectivity problem.
        if e.is_decode() {
            FeedError::Protocol(e.to_string())
        } else {
            FeedError::Transport(e)
        }
    }
}

impl From<rusqlite::Error> for FeedError {
    fn from(e: rusqlite::Error) -> Self {
        FeedError::Store(tokio_rusqlite::Error::Rusqlite(e))
    }
}

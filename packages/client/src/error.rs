use thiserror::Error;

use crate::sync::SyncState;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Theme was changed elsewhere: {0}")]
    Conflict(String),

    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Theme is not ready yet (currently {0:?})")]
    NotReady(SyncState),
}

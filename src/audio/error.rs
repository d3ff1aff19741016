use thiserror::Error;

/// Why a source could not be fetched or decoded.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("cannot decode media: {0}")]
    Decode(String),

    #[error("fetch cancelled")]
    Cancelled,
}

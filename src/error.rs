use reqwest::StatusCode;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request (usually its URL) could not be constructed.
    #[error("could not create request: {0}")]
    Request(String),

    #[error("server responded with {status}, expected {expected}")]
    Server {
        status: StatusCode,
        expected: StatusCode,
    },

    /// The response stream ended before the announced number of bytes arrived.
    #[error("response ended after {received} of {expected} bytes")]
    IncompleteBody { received: usize, expected: usize },

    #[error("server response was not recognized: {0}")]
    Decode(#[from] serde_json::Error),

    /// Downloads were stopped and the caller does not accept partial payloads.
    #[error("download cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("download worker failed: {0}")]
    Join(#[from] JoinError),
}

impl DownloadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DownloadError::Cancelled)
    }

    pub(crate) fn expect_status(status: StatusCode, expected: StatusCode) -> Result<()> {
        if status == expected {
            Ok(())
        } else {
            Err(DownloadError::Server { status, expected })
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;

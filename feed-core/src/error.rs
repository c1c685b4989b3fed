use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("response decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed payload from {endpoint}: {reason}")]
    InvalidPayload { endpoint: String, reason: String },
    #[error("driver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("command channel closed unexpectedly")]
    CommandChannelClosed,
}

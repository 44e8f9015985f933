use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment analysis is disabled")]
    Disabled,

    #[error("sentiment service call failed: {0}")]
    Service(String),

    #[error("unexpected sentiment response: {0}")]
    Response(String),
}

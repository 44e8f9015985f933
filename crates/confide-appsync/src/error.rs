use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppSyncError {
    /// The resolver's own word filter rejected the message.
    #[error("profanity detected by resolver")]
    Profanity,

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Response(String),
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use confide_appsync::AppSyncError;
use confide_filter::ValidationError;
use confide_sentiment::SentimentError;
use confide_types::api::ErrorBody;

/// Every way a request can fail. None of them are fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Query string or body that could not be parsed at all.
    #[error("malformed request: {0}")]
    Malformed(&'static str),

    #[error("inappropriate content detected")]
    Profanity,

    #[error("content flagged as potentially harmful")]
    Harmful,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("missing or invalid API key")]
    Unauthorized,

    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::UnknownOperation(_)
            | Self::Malformed(_)
            | Self::Profanity
            | Self::Harmful => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::UnknownOperation(_) | Self::Malformed(_) => "VALIDATION",
            Self::Profanity => "PROFANITY",
            Self::Harmful => "HARMFUL_CONTENT",
            Self::RateLimited => "RATE_LIMITED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Upstream(_) => "SERVER_ERROR",
        }
    }

    /// Text shown to the submitter. Upstream detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::UnknownOperation(op) => format!("Unknown operation: {}", op),
            Self::Malformed(what) => what.to_string(),
            Self::Profanity => "अच्छा लिखो 🙏".to_string(),
            Self::Harmful => "अच्छा लिखो 🙏 Keep it positive.".to_string(),
            Self::RateLimited => "Too many requests. Please wait a minute.".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::Upstream(_) => "Server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Upstream(detail) = &self {
            error!("Upstream failure: {}", detail);
        }

        let body = ErrorBody {
            error: self.public_message(),
            code: self.code().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<AppSyncError> for AppError {
    fn from(e: AppSyncError) -> Self {
        match e {
            AppSyncError::Profanity => Self::Profanity,
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<SentimentError> for AppError {
    fn from(e: SentimentError) -> Self {
        Self::Upstream(e.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Upstream(format!("{:#}", e))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Upstream(format!("spawn_blocking join error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_categories() {
        assert_eq!(AppError::from(ValidationError::Required).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Profanity.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Harmful.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Malformed("Invalid limit").code(), "VALIDATION");
        assert_eq!(AppError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::Upstream("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_detail_is_not_public() {
        let err = AppError::Upstream("db at /var/secret failed".into());
        assert_eq!(err.public_message(), "Server error");
    }

    #[test]
    fn resolver_profanity_maps_to_profanity() {
        assert!(matches!(AppError::from(AppSyncError::Profanity), AppError::Profanity));
        assert!(matches!(
            AppError::from(AppSyncError::GraphQl("nope".into())),
            AppError::Upstream(_)
        ));
    }
}

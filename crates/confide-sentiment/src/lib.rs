//! Sentiment screening through an external analysis service.

pub mod comprehend;
pub mod error;
pub mod gate;

use std::fmt;

use async_trait::async_trait;

pub use comprehend::ComprehendAnalyzer;
pub use error::SentimentError;
pub use gate::{Assessment, FailMode, ToxicityGate, DEFAULT_NEGATIVE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class confidence, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentScores {
    pub positive: f32,
    pub negative: f32,
    pub neutral: f32,
    pub mixed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentReport {
    pub label: Sentiment,
    pub scores: SentimentScores,
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentReport, SentimentError>;
}

/// Analyzer used when sentiment screening is switched off.
pub struct DisabledAnalyzer;

#[async_trait]
impl SentimentAnalyzer for DisabledAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<SentimentReport, SentimentError> {
        Err(SentimentError::Disabled)
    }
}

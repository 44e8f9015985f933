use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::{Sentiment, SentimentAnalyzer, SentimentError};

/// Negative-class confidence above which a NEGATIVE message is rejected.
pub const DEFAULT_NEGATIVE_THRESHOLD: f32 = 0.8;

/// What to do when the analyzer cannot be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailMode {
    /// Log and let the message through.
    #[default]
    Open,
    /// Reject the message as an upstream failure.
    Closed,
}

impl FromStr for FailMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(format!("invalid fail mode '{}' (expected open or closed)", other)),
        }
    }
}

impl fmt::Display for FailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// Result of running a message through the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub toxic: bool,
    /// `None` when the analyzer was disabled or failed open.
    pub label: Option<Sentiment>,
    pub negative: Option<f32>,
}

impl Assessment {
    fn skipped() -> Self {
        Self {
            toxic: false,
            label: None,
            negative: None,
        }
    }
}

#[derive(Clone)]
pub struct ToxicityGate {
    analyzer: Arc<dyn SentimentAnalyzer>,
    threshold: f32,
    fail_mode: FailMode,
}

impl ToxicityGate {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>, threshold: f32, fail_mode: FailMode) -> Self {
        Self {
            analyzer,
            threshold,
            fail_mode,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn fail_mode(&self) -> FailMode {
        self.fail_mode
    }

    /// Errors only under [`FailMode::Closed`].
    pub async fn assess(&self, text: &str) -> Result<Assessment, SentimentError> {
        match self.analyzer.analyze(text).await {
            Ok(report) => {
                let toxic = report.label == Sentiment::Negative
                    && report.scores.negative > self.threshold;
                if toxic {
                    info!(
                        "High negative sentiment detected ({:.3} > {:.3})",
                        report.scores.negative, self.threshold
                    );
                }
                Ok(Assessment {
                    toxic,
                    label: Some(report.label),
                    negative: Some(report.scores.negative),
                })
            }
            Err(SentimentError::Disabled) => Ok(Assessment::skipped()),
            Err(e) => match self.fail_mode {
                FailMode::Open => {
                    warn!("Sentiment check failed, allowing message: {}", e);
                    Ok(Assessment::skipped())
                }
                FailMode::Closed => {
                    warn!("Sentiment check failed, rejecting message: {}", e);
                    Err(e)
                }
            },
        }
    }
}

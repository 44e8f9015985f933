use async_trait::async_trait;
use aws_sdk_comprehend::Client;
use aws_sdk_comprehend::types::{LanguageCode, SentimentType};
use tracing::debug;

use crate::{Sentiment, SentimentAnalyzer, SentimentError, SentimentReport, SentimentScores};

/// Amazon Comprehend `DetectSentiment`, English only.
#[derive(Clone)]
pub struct ComprehendAnalyzer {
    client: Client,
}

impl ComprehendAnalyzer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential chain in `region`.
    pub async fn from_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SentimentAnalyzer for ComprehendAnalyzer {
    async fn analyze(&self, text: &str) -> Result<SentimentReport, SentimentError> {
        let resp = self
            .client
            .detect_sentiment()
            .text(text)
            .language_code(LanguageCode::En)
            .send()
            .await
            .map_err(|e| SentimentError::Service(e.into_service_error().to_string()))?;

        let label = match resp.sentiment() {
            Some(SentimentType::Positive) => Sentiment::Positive,
            Some(SentimentType::Negative) => Sentiment::Negative,
            Some(SentimentType::Neutral) => Sentiment::Neutral,
            Some(SentimentType::Mixed) => Sentiment::Mixed,
            Some(other) => {
                return Err(SentimentError::Response(format!(
                    "unknown sentiment '{}'",
                    other.as_str()
                )));
            }
            None => return Err(SentimentError::Response("no sentiment in response".into())),
        };

        let scores = resp
            .sentiment_score()
            .map(|s| SentimentScores {
                positive: s.positive().unwrap_or_default(),
                negative: s.negative().unwrap_or_default(),
                neutral: s.neutral().unwrap_or_default(),
                mixed: s.mixed().unwrap_or_default(),
            })
            .unwrap_or_default();

        debug!("Comprehend sentiment {} (negative {:.3})", label, scores.negative);
        Ok(SentimentReport { label, scores })
    }
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use confide_api::backend::Backend;
use confide_api::rate_limit::{RateLimitConfig, RateLimiter};
use confide_api::resolver::Resolver;
use confide_api::state::{AppState, AppStateInner};
use confide_db::Database;
use confide_filter::WordFilter;
use confide_gateway::dispatcher::Dispatcher;
use confide_sentiment::{
    DisabledAnalyzer, FailMode, Sentiment, SentimentAnalyzer, SentimentError, SentimentReport,
    SentimentScores, ToxicityGate,
};

pub const RESOLVER_KEY: &str = "resolver-test-key";

/// Flags any message mentioning "gloom" as strongly negative.
pub struct GloomDetector;

#[async_trait]
impl SentimentAnalyzer for GloomDetector {
    async fn analyze(&self, text: &str) -> Result<SentimentReport, SentimentError> {
        let (label, negative) = if text.contains("gloom") {
            (Sentiment::Negative, 0.95)
        } else {
            (Sentiment::Positive, 0.01)
        };
        Ok(SentimentReport {
            label,
            scores: SentimentScores {
                negative,
                ..Default::default()
            },
        })
    }
}

pub fn local_backend(analyzer: Arc<dyn SentimentAnalyzer>) -> Backend {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let gate = ToxicityGate::new(analyzer, 0.8, FailMode::Open);
    Backend::Local(Resolver::new(db, Arc::new(WordFilter::standard()), gate))
}

pub fn state_with(backend: Backend, rate: RateLimitConfig, resolver_key: Option<&str>) -> AppState {
    Arc::new(AppStateInner {
        backend,
        filter: Arc::new(WordFilter::standard()),
        limiter: RateLimiter::new(rate),
        dispatcher: Dispatcher::new(),
        resolver_key: resolver_key.map(str::to_string),
    })
}

pub fn local_state() -> AppState {
    state_with(
        local_backend(Arc::new(GloomDetector)),
        RateLimitConfig {
            max_requests: 1000,
            window: Duration::from_secs(60),
        },
        Some(RESOLVER_KEY),
    )
}

pub fn disabled_sentiment_state() -> AppState {
    state_with(
        local_backend(Arc::new(DisabledAnalyzer)),
        RateLimitConfig::default(),
        None,
    )
}

pub fn app(state: AppState) -> Router {
    confide_api::router(state)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_confession(message: &str) -> Request<Body> {
    post_json(
        "/api/confessions",
        &serde_json::json!({ "message": message }).to_string(),
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_value(resp: Response) -> Value {
    body_json(resp).await
}

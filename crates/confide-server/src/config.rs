use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use confide_api::rate_limit::RateLimitConfig;
use confide_sentiment::{DEFAULT_NEGATIVE_THRESHOLD, FailMode};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    Local { db_path: PathBuf },
    AppSync { endpoint: String, api_key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentProvider {
    Off,
    Comprehend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentConfig {
    pub provider: SentimentProvider,
    pub threshold: f32,
    pub fail_mode: FailMode,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub backend: BackendConfig,
    pub sentiment: SentimentConfig,
    pub rate_limit: RateLimitConfig,
    pub resolver_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let host = or("CONFIDE_HOST", "0.0.0.0");
        let port: u16 = or("CONFIDE_PORT", "3000").parse().context("invalid CONFIDE_PORT")?;
        let ip: IpAddr = host
            .parse()
            .with_context(|| format!("invalid CONFIDE_HOST '{}'", host))?;
        let addr = SocketAddr::new(ip, port);

        let backend = match or("CONFIDE_BACKEND", "local").to_ascii_lowercase().as_str() {
            "local" => BackendConfig::Local {
                db_path: PathBuf::from(or("CONFIDE_DB_PATH", "confide.db")),
            },
            "appsync" => BackendConfig::AppSync {
                endpoint: var("APPSYNC_ENDPOINT").context("APPSYNC_ENDPOINT is required for the appsync backend")?,
                api_key: var("APPSYNC_API_KEY").context("APPSYNC_API_KEY is required for the appsync backend")?,
            },
            other => bail!("invalid CONFIDE_BACKEND '{}' (expected local or appsync)", other),
        };

        let provider = match or("CONFIDE_SENTIMENT", "off").to_ascii_lowercase().as_str() {
            "off" => SentimentProvider::Off,
            "comprehend" => SentimentProvider::Comprehend,
            other => bail!("invalid CONFIDE_SENTIMENT '{}' (expected off or comprehend)", other),
        };

        let threshold = match var("CONFIDE_SENTIMENT_THRESHOLD") {
            Some(v) => v.parse::<f32>().context("invalid CONFIDE_SENTIMENT_THRESHOLD")?,
            None => DEFAULT_NEGATIVE_THRESHOLD,
        };
        if !(0.0..=1.0).contains(&threshold) {
            bail!("CONFIDE_SENTIMENT_THRESHOLD must be between 0 and 1, got {}", threshold);
        }

        let fail_mode = match var("CONFIDE_SENTIMENT_FAIL_MODE") {
            Some(v) => v.parse::<FailMode>().map_err(anyhow::Error::msg)?,
            None => FailMode::default(),
        };

        let max_requests: u32 = or("CONFIDE_RATE_LIMIT", "10").parse().context("invalid CONFIDE_RATE_LIMIT")?;
        let window_secs: u64 = or("CONFIDE_RATE_WINDOW_SECS", "60")
            .parse()
            .context("invalid CONFIDE_RATE_WINDOW_SECS")?;
        if max_requests == 0 || window_secs == 0 {
            bail!("CONFIDE_RATE_LIMIT and CONFIDE_RATE_WINDOW_SECS must be positive");
        }

        Ok(Self {
            addr,
            backend,
            sentiment: SentimentConfig {
                provider,
                threshold,
                fail_mode,
                region: or("AWS_REGION", "ap-south-1"),
            },
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            resolver_key: var("CONFIDE_RESOLVER_API_KEY"),
        })
    }
}

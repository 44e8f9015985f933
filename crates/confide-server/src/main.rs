mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use confide_api::backend::Backend;
use confide_api::rate_limit::{self, RateLimiter};
use confide_api::resolver::Resolver;
use confide_api::state::{AppState, AppStateInner};
use confide_appsync::AppSyncClient;
use confide_db::Database;
use confide_filter::{POLICY_VERSION, WordFilter};
use confide_gateway::dispatcher::Dispatcher;
use confide_sentiment::{ComprehendAnalyzer, DisabledAnalyzer, SentimentAnalyzer, ToxicityGate};

use crate::config::{BackendConfig, Config, SentimentConfig, SentimentProvider};

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "confide=debug,confide_api=debug,confide_gateway=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    let filter = Arc::new(WordFilter::standard());
    info!("Word filter v{} loaded with {} terms", POLICY_VERSION, filter.len());

    let backend = build_backend(&config, filter.clone()).await?;
    info!("Using {} backend", backend.name());

    if config.resolver_key.is_some() && backend.resolver().is_none() {
        warn!("CONFIDE_RESOLVER_API_KEY is set but the resolver route only exists for the local backend");
    }

    let limiter = RateLimiter::new(config.rate_limit);
    let limits = limiter.config();
    info!(
        "Rate limit: {} posts per {}s per client",
        limits.max_requests,
        limits.window.as_secs()
    );
    tokio::spawn(rate_limit::run_prune_loop(limiter.clone(), PRUNE_INTERVAL));

    let state: AppState = Arc::new(AppStateInner {
        backend,
        filter,
        limiter,
        dispatcher: Dispatcher::new(),
        resolver_key: config.resolver_key.clone(),
    });

    let app = confide_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Confide server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_backend(config: &Config, filter: Arc<WordFilter>) -> anyhow::Result<Backend> {
    match &config.backend {
        BackendConfig::Local { db_path } => {
            let db = Database::open(db_path)
                .with_context(|| format!("failed to open database at {}", db_path.display()))?;
            let gate = build_gate(&config.sentiment).await;
            Ok(Backend::Local(Resolver::new(Arc::new(db), filter, gate)))
        }
        BackendConfig::AppSync { endpoint, api_key } => {
            if config.sentiment.provider != SentimentProvider::Off {
                warn!("CONFIDE_SENTIMENT is ignored with the appsync backend");
            }
            let client = AppSyncClient::new(endpoint.clone(), api_key.clone())?;
            info!("Forwarding confessions to {}", client.endpoint());
            Ok(Backend::AppSync(client))
        }
    }
}

async fn build_gate(sentiment: &SentimentConfig) -> ToxicityGate {
    let analyzer: Arc<dyn SentimentAnalyzer> = match sentiment.provider {
        SentimentProvider::Off => {
            info!("Sentiment screening disabled");
            Arc::new(DisabledAnalyzer)
        }
        SentimentProvider::Comprehend => {
            info!("Sentiment screening via Comprehend in {}", sentiment.region);
            Arc::new(ComprehendAnalyzer::from_region(&sentiment.region).await)
        }
    };

    let gate = ToxicityGate::new(analyzer, sentiment.threshold, sentiment.fail_mode);
    info!(
        "Toxicity gate: negative threshold {}, fail {}",
        gate.threshold(),
        gate.fail_mode()
    );
    gate
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await;
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C, shutting down...");
    }
}

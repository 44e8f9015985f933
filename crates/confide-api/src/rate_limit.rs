//! Fixed-window rate limiting per client address.
//!
//! Counters live in this process only. Running more than one instance
//! needs a shared counter store instead.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Record a request from `client`. Returns false when it is over the limit.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        let key = client_digest(client);
        let mut windows = self.lock();

        match windows.get_mut(&key) {
            Some(window) if now < window.reset_at => {
                if window.count >= self.config.max_requests {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                windows.insert(
                    key,
                    Window {
                        count: 1,
                        reset_at: now + self.config.window,
                    },
                );
                true
            }
        }
    }

    /// Drop windows that have already reset. Returns how many were removed.
    pub fn prune_at(&self, now: Instant) -> usize {
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|_, w| now < w.reset_at);
        before - windows.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Window>> {
        // A panic mid-update leaves at worst one stale counter
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Background task that prunes expired windows on an interval.
pub async fn run_prune_loop(limiter: RateLimiter, every: Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;
        let pruned = limiter.prune_at(Instant::now());
        if pruned > 0 {
            debug!("Rate limiter: pruned {} expired windows", pruned);
        }
    }
}

/// Identify the caller: first `x-forwarded-for` hop, then `x-real-ip`,
/// then the socket peer.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Truncated SHA-256 of a client key, so raw addresses are never stored or logged.
pub fn client_digest(client: &str) -> String {
    let digest = Sha256::digest(client.as_bytes());
    hex::encode(&digest[..8])
}

pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(req.headers(), peer);

    if !state.limiter.check(&client) {
        warn!("Rate limit exceeded for client {}", client_digest(&client));
        return AppError::RateLimited.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default())
    }

    #[test]
    fn eleventh_request_in_window_is_rejected() {
        let limiter = limiter();
        let start = Instant::now();

        for i in 0..10 {
            assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(i)), "request {}", i);
        }
        assert!(!limiter.check_at("1.2.3.4", start + Duration::from_secs(30)));
        assert!(!limiter.check_at("1.2.3.4", start + Duration::from_secs(59)));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..11 {
            limiter.check_at("1.2.3.4", start);
        }
        assert!(!limiter.check_at("1.2.3.4", start + Duration::from_secs(10)));
        assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(60)));
        assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(61)));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_at("a", now));
        }
        assert!(!limiter.check_at("a", now));
        assert!(limiter.check_at("b", now));
    }

    #[test]
    fn prune_removes_only_expired_windows() {
        let limiter = limiter();
        let start = Instant::now();
        limiter.check_at("old", start);
        limiter.check_at("new", start + Duration::from_secs(50));

        assert_eq!(limiter.prune_at(start + Duration::from_secs(70)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn client_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("9.9.9.9, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("8.8.8.8"));
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        assert_eq!(client_key(&headers, Some(peer)), "9.9.9.9");

        headers.remove("x-forwarded-for");
        assert_eq!(client_key(&headers, Some(peer)), "8.8.8.8");

        headers.remove("x-real-ip");
        assert_eq!(client_key(&headers, Some(peer)), "127.0.0.1");
        assert_eq!(client_key(&headers, None), "unknown");
    }

    #[test]
    fn digest_hides_address() {
        let digest = client_digest("203.0.113.7");
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, client_digest("203.0.113.7"));
    }
}

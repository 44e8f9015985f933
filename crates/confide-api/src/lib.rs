pub mod backend;
pub mod confessions;
pub mod error;
pub mod feed;
pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod resolver;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::state::AppState;

/// All HTTP routes. Cross-cutting layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let confessions = get(confessions::list_confessions).merge(
        post(confessions::create_confession)
            .layer(from_fn_with_state(state.clone(), rate_limit::rate_limit)),
    );

    let mut app = Router::new()
        .route("/api/confessions", confessions)
        .route("/api/confessions/live", get(feed::live_feed))
        .route("/health", get(health::health));

    // Direct resolver invocation only exists for the local backend, behind a key
    if state.resolver_key.is_some() && state.backend.resolver().is_some() {
        app = app.route(
            "/resolver",
            post(resolver::invoke)
                .layer(from_fn_with_state(state.clone(), middleware::require_api_key)),
        );
    }

    app.with_state(state)
}

use std::sync::Arc;

use confide_filter::WordFilter;
use confide_gateway::dispatcher::Dispatcher;

use crate::backend::Backend;
use crate::rate_limit::RateLimiter;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub backend: Backend,
    pub filter: Arc<WordFilter>,
    pub limiter: RateLimiter,
    pub dispatcher: Dispatcher,
    /// Key required on `/resolver`; the route is not mounted without one.
    pub resolver_key: Option<String>,
}

use std::sync::Arc;

use crate::config::Config;
use crate::matching::scoring::ResumeMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring engine. Holds the normalizer and, through it, the shared language model.
    pub matcher: Arc<ResumeMatcher>,
}

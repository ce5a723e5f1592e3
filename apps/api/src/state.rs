use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::embedding::Embedder;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Cached embedding model handle, shared with the semantic scorer.
    pub embedder: Arc<dyn Embedder>,
    pub analyzer: Analyzer,
}

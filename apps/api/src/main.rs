mod analysis;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::embedding::{Embedder, FastEmbedder};
use crate::analysis::scorer::{KeywordScorer, MatchScorer, SemanticScorer};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fitcheck v{}", env!("CARGO_PKG_VERSION"));

    // Embedding model handle, loaded lazily and cached for the process lifetime
    let fast_embedder = Arc::new(FastEmbedder::new(
        config.embedding_model,
        config.model_cache_dir.clone(),
    ));
    info!(
        "Embedding model: {} (cache: {})",
        config.embedding_model,
        config.model_cache_dir.display()
    );

    if config.semantic_scoring && config.warm_up_model {
        let warm = Arc::clone(&fast_embedder);
        tokio::task::spawn_blocking(move || match warm.warm_up() {
            Ok(()) => info!("Embedding model ready"),
            Err(e) => warn!("Embedding model warm-up failed: {e}. Requests will retry the load and fall back to keyword scoring"),
        });
    }

    let embedder: Arc<dyn Embedder> = fast_embedder;
    let semantic: Option<Arc<dyn MatchScorer>> = if config.semantic_scoring {
        Some(Arc::new(SemanticScorer::new(Arc::clone(&embedder))))
    } else {
        info!("Semantic scoring disabled, using keyword overlap only");
        None
    };
    let analyzer = Analyzer::new(semantic, Arc::new(KeywordScorer));

    // Build app state
    let state = AppState {
        config: config.clone(),
        embedder,
        analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port).parse()?;
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

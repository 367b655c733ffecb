mod config;
mod errors;
mod extraction;
mod matching;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::language_model::LanguageModel;
use crate::matching::normalizer::LexiconNormalizer;
use crate::matching::scoring::ResumeMatcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Load the language model once; scoring never loads resources.
    let model = load_language_model(&config)?;
    info!(
        stopwords = model.stopword_count(),
        lexicon = model.lexicon_size(),
        irregular_forms = model.irregular_count(),
        "Language model loaded"
    );

    let normalizer = LexiconNormalizer::new(Arc::new(model));
    let matcher = Arc::new(ResumeMatcher::new(Arc::new(normalizer)));
    info!(
        "Matcher initialized (default top_n_keywords: {})",
        config.default_top_n_keywords
    );

    let state = AppState {
        config: config.clone(),
        matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_language_model(config: &Config) -> Result<LanguageModel> {
    match &config.language_model_dir {
        Some(dir) => {
            info!("Loading language model from {}", dir.display());
            LanguageModel::from_dir(dir)
                .with_context(|| format!("Failed to load language model from {}", dir.display()))
        }
        None => LanguageModel::embedded().context("Bundled language model is invalid"),
    }
}

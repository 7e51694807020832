//! Claimscope Viewer
//!
//! Read-only HTTP service over a directory of analysis artifacts: JSON query
//! endpoints plus a single browser page that calls them.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use claimscope_corpus::CorpusCache;
use config::ViewerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Viewer error
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build application state for `config`
pub fn app_state(config: &ViewerConfig) -> AppState {
    AppState {
        cache: Arc::new(CorpusCache::new(
            config.results_dir.clone(),
            config.ignored_files.clone(),
            config.reload_interval(),
        )),
    }
}

/// Start the Viewer HTTP server
///
/// Loads the corpus once up front so load problems show in the startup log,
/// then serves until the process is stopped.
pub async fn start_server(config: ViewerConfig) -> Result<(), ViewerError> {
    info!("Starting Claimscope Viewer");
    info!("Results directory: {}", config.results_dir.display());
    info!("Reload interval: {} seconds", config.reload_interval_secs);

    let state = app_state(&config);

    let cache = Arc::clone(&state.cache);
    let corpus = tokio::task::spawn_blocking(move || cache.reload())
        .await
        .map_err(|e| ViewerError::Server(e.to_string()))?;
    info!(papers = corpus.len(), load_errors = corpus.errors.len(), "Initial corpus loaded");

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Viewer listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ViewerError::Server(e.to_string()))?;

    Ok(())
}

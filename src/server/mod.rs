//! HTTP server wiring for datachat.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::pipeline::ChatPipeline;

pub mod routes;

/// Application state shared across handlers.
pub struct AppState {
    pub cfg: Config,
    pub pipeline: ChatPipeline,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/chat", post(routes::chat))
        .route("/upload", post(routes::upload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(cfg: Config) -> Result<()> {
    let pipeline = ChatPipeline::from_config(&cfg)?;
    let state = Arc::new(AppState { cfg: cfg.clone(), pipeline });

    let app = router(state);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

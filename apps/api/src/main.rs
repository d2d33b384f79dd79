mod config;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod render;
mod retrieval;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::pipeline::Pipeline;
use crate::extraction::{PdfTextExtractor, TextSplitter};
use crate::llm_client::LlmClient;
use crate::retrieval::OpenAiEmbedder;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentScan API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client for chat and embeddings; the key is supplied per request.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let llm = LlmClient::new(http, config.openai_api_base.clone());
    info!(
        "LLM client initialized (chat: {}, embeddings: {}, base: {})",
        llm_client::MODEL,
        retrieval::openai_embed::EMBEDDING_MODEL,
        config.openai_api_base
    );

    let pipeline = Pipeline::new(
        Arc::new(PdfTextExtractor::new(TextSplitter::default())),
        Arc::new(OpenAiEmbedder::new(llm.clone())),
        Arc::new(llm),
    );

    let state = AppState {
        sessions: SessionStore::new(config.session_idle_ttl_secs),
        pipeline,
        config: config.clone(),
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

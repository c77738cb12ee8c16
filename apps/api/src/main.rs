mod config;
mod errors;
mod extract;
mod llm_client;
mod render;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::render::LatexCompiler;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resumer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        config.gemini_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", config.gemini_model);

    // PDF compilation is optional at runtime; a missing toolchain only fails /api/compile
    let compiler = LatexCompiler::from_command_line(&config.latex_command, config.latex_timeout);
    info!(
        "LaTeX compiler: {} (timeout {:?})",
        compiler.program(),
        config.latex_timeout
    );

    let state = AppState {
        llm: Arc::new(llm),
        compiler,
        max_body_bytes: config.max_body_bytes,
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

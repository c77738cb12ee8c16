use std::sync::Arc;

use crate::llm_client::LanguageModel;
use crate::render::compile::LatexCompiler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The hosted model. `GeminiClient` in production, a stub in tests.
    pub llm: Arc<dyn LanguageModel>,
    pub compiler: LatexCompiler,
    pub max_body_bytes: usize,
}

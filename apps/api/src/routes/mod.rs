pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The upload form: instructions, drag-and-drop resume, LaTeX output pane.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        .route("/api/generate", post(handlers::handle_generate))
        .route(
            "/api/generate/upload",
            post(handlers::handle_generate_upload),
        )
        .route("/api/render", post(handlers::handle_render))
        .route("/api/compile", post(handlers::handle_compile))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

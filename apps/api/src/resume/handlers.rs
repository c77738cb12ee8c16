//! Axum route handlers for resume editing, rendering and compilation.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::extract::extract_resume_text;
use crate::render::generate_tex;
use crate::resume::editor::{edit_resume, MISSING_INPUT_MESSAGE};
use crate::resume::models::Resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub tex: String,
    pub resume: Resume,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub tex: String,
    pub resume: Resume,
    /// Text extracted from the upload, so the client can show what the model saw.
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub tex: String,
}

#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    pub tex: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate
///
/// Applies the instructions to already-extracted resume text and returns LaTeX.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload?;
    let instructions = request.instructions.unwrap_or_default();
    let resume_text = request.resume_text.unwrap_or_default();

    let resume = edit_resume(state.llm.as_ref(), &instructions, &resume_text).await?;
    let tex = generate_tex(&resume);
    info!("Generated {} bytes of LaTeX", tex.len());

    Ok(Json(GenerateResponse { tex, resume }))
}

/// POST /api/generate/upload
///
/// Multipart form with an `instructions` text field and a `resume` file
/// (`.pdf` or `.txt`). Extracts the text server-side, then runs the same pipeline.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_generate_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut instructions: Option<String> = None;
    let mut upload: Option<(Option<String>, Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("instructions") => {
                instructions = Some(field.text().await?);
            }
            Some("resume") | Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                upload = Some((file_name, content_type, data));
            }
            _ => {}
        }
    }

    let (instructions, (file_name, content_type, data)) = match (instructions, upload) {
        (Some(i), Some(u)) if !i.trim().is_empty() => (i, u),
        _ => return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string())),
    };

    info!(
        file_name = file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = data.len(),
        "Resume uploaded"
    );

    let resume_text =
        extract_resume_text(file_name.as_deref(), content_type.as_deref(), data).await?;
    let resume = edit_resume(state.llm.as_ref(), &instructions, &resume_text).await?;
    let tex = generate_tex(&resume);

    Ok(Json(UploadResponse {
        tex,
        resume,
        resume_text,
    }))
}

/// POST /api/render
///
/// Renders a resume document directly, without a model call.
pub async fn handle_render(
    payload: Result<Json<Resume>, JsonRejection>,
) -> Result<Json<RenderResponse>, AppError> {
    let Json(resume) = payload?;
    Ok(Json(RenderResponse {
        tex: generate_tex(&resume),
    }))
}

/// POST /api/compile
///
/// Compiles LaTeX source to PDF with the server's TeX toolchain.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_compile(
    State(state): State<AppState>,
    payload: Result<Json<CompileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    if request.tex.trim().is_empty() {
        return Err(AppError::Validation("tex cannot be empty".to_string()));
    }

    let pdf = state.compiler.compile(&request.tex).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume.pdf\"",
            ),
        ],
        pdf,
    ))
}

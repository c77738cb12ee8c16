use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::render::compile::CompileError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// A request body axum could not extract (malformed, wrong shape, over the limit).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Could not read resume: {0}")]
    Extraction(String),

    #[error("AI model error: {0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Rejected { status, message } => {
                let code = if *status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "INVALID_REQUEST"
                };
                (*status, code, message.clone())
            }
            AppError::Extraction(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                self.to_string(),
            ),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", self.to_string())
            }
            AppError::Compile(e) => {
                tracing::warn!("LaTeX compile error: {e}");
                let (status, code) = match e {
                    CompileError::Unavailable(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "COMPILER_UNAVAILABLE")
                    }
                    CompileError::Failed { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "COMPILE_FAILED")
                    }
                    CompileError::TimedOut(_) => (StatusCode::GATEWAY_TIMEOUT, "COMPILE_TIMEOUT"),
                    CompileError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "COMPILE_IO_ERROR"),
                };
                (status, code, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        // `error` stays a plain string so existing front-ends can display it directly.
        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

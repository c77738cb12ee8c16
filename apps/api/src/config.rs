use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on request bodies, uploads included.
    pub max_body_bytes: usize,
    pub latex_command: String,
    pub latex_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            port: env_or("PORT", "3001")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_body_bytes: env_or("MAX_BODY_BYTES", "5242880")
                .parse::<usize>()
                .context("MAX_BODY_BYTES must be a byte count")?,
            latex_command: env_or("LATEX_COMMAND", "pdflatex"),
            latex_timeout: Duration::from_secs(
                env_or("LATEX_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("LATEX_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

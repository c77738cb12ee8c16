//! Resume editing — parses the current resume text and applies the user's
//! instructions in a single model call.
//!
//! Flow: validate inputs → build prompt → LLM → extract JSON object →
//!       deserialize `Resume` → normalize.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{call_json, LanguageModel, LlmError};
use crate::resume::models::Resume;
use crate::resume::normalize::normalize_resume;
use crate::resume::prompts::{resume_edit_prompt, resume_edit_system};

pub const MISSING_INPUT_MESSAGE: &str = "Missing instructions or resume text.";

/// Runs the edit pipeline and returns the updated, normalized resume.
pub async fn edit_resume(
    llm: &dyn LanguageModel,
    instructions: &str,
    resume_text: &str,
) -> Result<Resume, AppError> {
    if instructions.trim().is_empty() || resume_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }

    let prompt = resume_edit_prompt(instructions, resume_text);
    info!(
        model = llm.model_name(),
        prompt_chars = prompt.len(),
        "Requesting resume edit"
    );

    let mut resume: Resume = call_json(llm, &prompt, resume_edit_system()).await?;
    normalize_resume(&mut resume);

    if resume.is_empty() {
        return Err(AppError::Llm(LlmError::EmptyContent));
    }

    info!(
        education = resume.education.len(),
        experience = resume.experience.len(),
        projects = resume.projects.len(),
        "Resume edit parsed"
    );
    Ok(resume)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Replays a canned reply and remembers the last prompt it was sent.
    pub struct StubModel {
        reply: Result<String, u16>,
        pub last_prompt: Mutex<Option<String>>,
    }

    impl StubModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for StubModel {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "stubbed failure".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_edit_resume_rejects_blank_inputs() {
        let llm = StubModel::replying("{}");
        let err = edit_resume(&llm, "   ", "resume").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == MISSING_INPUT_MESSAGE));

        let err = edit_resume(&llm, "add a job", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(llm.last_prompt.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_edit_resume_parses_fenced_reply() {
        let llm = StubModel::replying(
            "```json\n{\"name\": \"Ada\", \"experience\": [{\"company\": \"Acme\", \"dates\": \"March 2020 - Present\", \"description\": [\"Built things.\"]}]}\n```",
        );
        let resume = edit_resume(&llm, "Add Acme", "Ada\nEngineer").await.unwrap();

        assert_eq!(resume.name.as_deref(), Some("Ada"));
        assert_eq!(resume.experience[0].dates.as_deref(), Some("Mar 2020 - Present"));
        assert_eq!(resume.experience[0].description[0], "Built things");

        let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Add Acme"));
        assert!(prompt.contains("Ada\nEngineer"));
    }

    #[tokio::test]
    async fn test_edit_resume_without_json_object() {
        let llm = StubModel::replying("I could not read that resume, sorry.");
        let err = edit_resume(&llm, "fix", "text").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::NoJsonObject)));
    }

    #[tokio::test]
    async fn test_edit_resume_with_malformed_json() {
        let llm = StubModel::replying("{\"name\": \"Ada\",, }");
        let err = edit_resume(&llm, "fix", "text").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_edit_resume_with_empty_object() {
        let llm = StubModel::replying("{}");
        let err = edit_resume(&llm, "fix", "text").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_edit_resume_with_only_blank_entries() {
        let llm = StubModel::replying(r#"{"name": "   ", "education": [{"institution": "  "}]}"#);
        let err = edit_resume(&llm, "fix", "text").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_edit_resume_propagates_api_failure() {
        let llm = StubModel::failing(503);
        let err = edit_resume(&llm, "fix", "text").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::Api { status: 503, .. })));
    }
}

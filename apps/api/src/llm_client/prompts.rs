// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Output contract appended to every system prompt that expects a JSON object back.
pub const JSON_ONLY_RULES: &str = "\
- Your entire output MUST be a single, valid JSON object.
- DO NOT add any conversational text, explanations, or markdown fences.";

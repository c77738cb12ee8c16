// Resume editing: schema, prompts, the LLM edit pipeline, output clean-up and
// the HTTP handlers that tie it to text extraction and rendering.

pub mod editor;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod prompts;

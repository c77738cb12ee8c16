// Rendering: resume JSON → LaTeX source → (optionally) PDF.
// `latex` is pure; `compile` shells out to the TeX toolchain.

pub mod compile;
pub mod latex;
mod template;

pub use compile::LatexCompiler;
pub use latex::generate_tex;

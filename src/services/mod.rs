pub mod artifact_writer;
pub mod explanation;
pub mod mcq_generator;
pub mod pdf_renderer;
pub mod prompts;
pub mod text_extractor;

pub use artifact_writer::{is_artifact_name, ArtifactPaths, ArtifactWriter};
pub use explanation::{ExplanationGenerator, ExplanationStyle};
pub use mcq_generator::McqGenerator;

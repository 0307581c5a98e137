pub mod openai;
pub mod replicate;

pub use openai::{OpenAiAnalysisService, OpenAiRefinementService};
pub use replicate::ReplicateGenerationService;

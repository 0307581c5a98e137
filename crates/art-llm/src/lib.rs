pub mod client;
pub mod error;
pub mod provider_factory;
pub mod providers;
pub mod service;

pub use art_core::Creativity;
pub use client::build_http_client;
pub use error::{Result, ServiceError};
pub use provider_factory::{create_services, Services};
pub use providers::{OpenAiAnalysisService, OpenAiRefinementService, ReplicateGenerationService};
pub use service::{AnalysisService, GenerationService, RefinementService};

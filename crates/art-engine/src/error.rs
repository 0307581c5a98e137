use art_core::{LineageError, UnknownStrategyError};
use art_llm::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid lineage: {0}")]
    InvalidLineage(#[from] LineageError),

    #[error(transparent)]
    UnknownStrategy(#[from] UnknownStrategyError),

    #[error("Artistic concept must not be empty")]
    EmptyConcept,

    /// Refinement produced no usable concept; nothing was committed.
    #[error("Refinement failed: {0}")]
    Refinement(#[source] ServiceError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

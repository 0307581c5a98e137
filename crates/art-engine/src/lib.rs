//! Modification engine for evolving artwork lineages.
//!
//! The pipeline is strictly linear: analyze the latest image, pick a strategy
//! (explicitly or through the [`StrategySelector`]), refine the concept with the
//! strategy's prompt, render it, and append the result to a copy of the lineage.

pub mod creator;
pub mod engine;
pub mod error;
pub mod prompts;
pub mod selector;

pub use creator::ArtworkCreator;
pub use engine::{ModificationEngine, ModificationOutcome};
pub use error::{EngineError, Result};
pub use selector::{parse_strategy_number, Selection, SelectionFallback, StrategySelector};

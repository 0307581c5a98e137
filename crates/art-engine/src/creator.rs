use art_core::{Creativity, Lineage};
use log::info;

use crate::engine::ModificationEngine;
use crate::error::{EngineError, Result};
use crate::prompts::concept_development_prompt;

/// Turns a raw idea into the seed iteration of a new lineage.
#[derive(Clone)]
pub struct ArtworkCreator {
    engine: ModificationEngine,
}

impl ArtworkCreator {
    pub fn new(engine: ModificationEngine) -> Self {
        Self { engine }
    }

    /// Refine `idea` into a concept and render it.
    ///
    /// A failed render falls back to the engine's fallback image, a failed
    /// refinement aborts.
    pub async fn create(&self, idea: &str) -> Result<Lineage> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(EngineError::EmptyConcept);
        }

        let refined = self
            .engine
            .refinement()
            .refine(&concept_development_prompt(idea), Creativity::Measured)
            .await
            .map_err(EngineError::Refinement)?;
        let refined = refined.trim();
        if refined.is_empty() {
            return Err(EngineError::EmptyConcept);
        }

        let (image_reference, rendered) = self.engine.render_or_fallback(refined).await;
        info!("[creator] Created seed artwork (rendered: {})", rendered);

        Ok(Lineage::seed(refined, image_reference))
    }
}

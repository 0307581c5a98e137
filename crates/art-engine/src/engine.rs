use std::sync::Arc;

use art_core::config::DEFAULT_FALLBACK_IMAGE;
use art_core::{Iteration, Lineage, ModificationStrategy, StrategyChoice};
use art_llm::{AnalysisService, GenerationService, RefinementService, ServiceError, Services};
use log::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::prompts::{build_instruction, PromptContext};
use crate::selector::{Selection, StrategySelector};

/// Result of one modification step.
#[derive(Debug, Clone)]
pub struct ModificationOutcome {
    /// The iteration that was appended.
    pub iteration: Iteration,
    /// Copy of the input lineage with `iteration` appended.
    pub lineage: Lineage,
    /// False when the generation service failed and the fallback image was used.
    pub rendered: bool,
    /// Present when the strategy was chosen automatically.
    pub selection: Option<Selection>,
}

impl ModificationOutcome {
    pub fn strategy(&self) -> Option<ModificationStrategy> {
        self.iteration.strategy_label
    }
}

/// Runs analyze, select, refine, render and commit for a single step.
#[derive(Clone)]
pub struct ModificationEngine {
    refinement: Arc<dyn RefinementService>,
    generation: Arc<dyn GenerationService>,
    analysis: Option<Arc<dyn AnalysisService>>,
    selector: StrategySelector,
    fallback_image: String,
}

impl ModificationEngine {
    pub fn new(services: Services) -> Self {
        Self {
            selector: StrategySelector::new(services.refinement.clone()),
            refinement: services.refinement,
            generation: services.generation,
            analysis: services.analysis,
            fallback_image: DEFAULT_FALLBACK_IMAGE.to_string(),
        }
    }

    pub fn with_fallback_image(mut self, fallback_image: impl Into<String>) -> Self {
        self.fallback_image = fallback_image.into();
        self
    }

    pub fn fallback_image(&self) -> &str {
        &self.fallback_image
    }

    /// Apply a modification given a strategy tag as text (`auto` included).
    pub async fn apply_modification_tagged(
        &self,
        lineage: &Lineage,
        tag: &str,
        feedback: &str,
    ) -> Result<ModificationOutcome> {
        let choice: StrategyChoice = tag.parse()?;
        self.apply_modification(lineage, choice, feedback).await
    }

    /// Produce the next iteration of `lineage`.
    ///
    /// The input lineage is left untouched; the returned outcome carries a
    /// copy with the new iteration appended. Refinement failures abort the
    /// step without committing anything. Analysis and render failures are
    /// absorbed.
    pub async fn apply_modification(
        &self,
        lineage: &Lineage,
        choice: StrategyChoice,
        feedback: &str,
    ) -> Result<ModificationOutcome> {
        lineage.validate()?;
        let feedback = feedback.trim();
        let latest = lineage.latest();

        let analysis = self.analyze(&latest.image_reference).await;

        let (strategy, selection) = match choice {
            StrategyChoice::Explicit(strategy) => (strategy, None),
            StrategyChoice::Auto => {
                let selection = self
                    .selector
                    .select(lineage, analysis.as_deref(), feedback)
                    .await;
                (selection.strategy, Some(selection))
            }
        };
        info!(
            "[engine] Applying {} to iteration {}",
            strategy, latest.index
        );

        let ctx = PromptContext::from_lineage(lineage, feedback);
        let concept = match build_instruction(strategy, &ctx) {
            None => latest.concept.clone(),
            Some(instruction) => {
                let refined = self
                    .refinement
                    .refine(&instruction.prompt, instruction.creativity)
                    .await
                    .map_err(EngineError::Refinement)?;
                let refined = refined.trim();
                if refined.is_empty() {
                    return Err(EngineError::Refinement(ServiceError::EmptyResponse(
                        "refinement returned no concept".to_string(),
                    )));
                }
                refined.to_string()
            }
        };

        let (image_reference, rendered) = self.render_or_fallback(&concept).await;

        let mut updated = lineage.clone();
        let iteration = updated
            .append(strategy, concept, image_reference, feedback, analysis)
            .clone();
        debug!(
            "[engine] Committed iteration {} (rendered: {})",
            iteration.index, rendered
        );

        Ok(ModificationOutcome {
            iteration,
            lineage: updated,
            rendered,
            selection,
        })
    }

    async fn analyze(&self, image_reference: &str) -> Option<String> {
        let service = self.analysis.as_ref()?;
        match service.analyze(image_reference).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("[engine] Image analysis failed for {}: {}", image_reference, e);
                None
            }
        }
    }

    pub(crate) async fn render_or_fallback(&self, concept: &str) -> (String, bool) {
        match self.generation.render(concept).await {
            Ok(reference) if !reference.trim().is_empty() => (reference, true),
            Ok(_) => {
                warn!("[engine] Generation returned an empty reference, using fallback image");
                (self.fallback_image.clone(), false)
            }
            Err(e) => {
                warn!("[engine] Generation failed, using fallback image: {}", e);
                (self.fallback_image.clone(), false)
            }
        }
    }

    pub(crate) fn refinement(&self) -> &Arc<dyn RefinementService> {
        &self.refinement
    }
}

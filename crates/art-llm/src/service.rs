use art_core::Creativity;
use async_trait::async_trait;

use crate::error::Result;

/// Turns an instruction prompt into refined descriptive text.
#[async_trait]
pub trait RefinementService: Send + Sync {
    /// Refine text
    ///
    /// # Arguments
    /// * `prompt` - Full instruction prompt
    /// * `creativity` - Relative intensity of the transformation
    async fn refine(&self, prompt: &str, creativity: Creativity) -> Result<String>;
}

/// Renders an image for a text prompt and returns a reference to it.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn render(&self, prompt: &str) -> Result<String>;
}

/// Produces a textual critique of an image.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, image_reference: &str) -> Result<String>;
}

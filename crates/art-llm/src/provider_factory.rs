//! Service Factory
//!
//! Creates the refinement, generation and analysis services from configuration.

use std::sync::Arc;
use std::time::Duration;

use art_core::Config;

use crate::client::build_http_client;
use crate::error::{Result, ServiceError};
use crate::providers::{OpenAiAnalysisService, OpenAiRefinementService, ReplicateGenerationService};
use crate::service::{AnalysisService, GenerationService, RefinementService};

/// The three collaborators the engine depends on.
#[derive(Clone)]
pub struct Services {
    pub refinement: Arc<dyn RefinementService>,
    pub generation: Arc<dyn GenerationService>,
    pub analysis: Option<Arc<dyn AnalysisService>>,
}

/// Validate service configuration without creating any client
pub fn validate_services_config(config: &Config) -> Result<()> {
    if config.refinement.api_key.is_empty() {
        return Err(ServiceError::Config(
            "Refinement API key is required".to_string(),
        ));
    }
    if config.generation.api_token.is_empty() {
        return Err(ServiceError::Config(
            "Generation API token is required".to_string(),
        ));
    }
    Ok(())
}

/// Create all services based on the current configuration
pub fn create_services(config: &Config) -> Result<Services> {
    validate_services_config(config)?;

    let client = build_http_client(Duration::from_secs(config.request_timeout_secs))?;

    let refinement = OpenAiRefinementService::new(&config.refinement.api_key)
        .with_client(client.clone())
        .with_base_url(&config.refinement.base_url)
        .with_model(&config.refinement.model)
        .with_max_output_tokens(config.refinement.max_output_tokens);

    let generation =
        ReplicateGenerationService::new(&config.generation.api_token, config.generated_images_dir())
            .with_client(client.clone())
            .with_base_url(&config.generation.base_url)
            .with_model(&config.generation.model)
            .with_size(config.generation.width, config.generation.height);

    let analysis = create_analysis(config, client);

    log::info!(
        "Services ready: refinement model '{}', generation model '{}', analysis {}",
        config.refinement.model,
        config.generation.model,
        if analysis.is_some() { "enabled" } else { "disabled" }
    );

    Ok(Services {
        refinement: Arc::new(refinement),
        generation: Arc::new(generation),
        analysis,
    })
}

fn create_analysis(
    config: &Config,
    client: reqwest_middleware::ClientWithMiddleware,
) -> Option<Arc<dyn AnalysisService>> {
    if !config.analysis.enabled {
        log::debug!("Image analysis disabled by configuration");
        return None;
    }

    let api_key = config
        .analysis
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| config.refinement.api_key.clone());
    if api_key.is_empty() {
        log::warn!("Image analysis enabled but no API key configured, skipping");
        return None;
    }

    let base_url = config
        .analysis
        .base_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| config.refinement.base_url.clone());

    Some(Arc::new(
        OpenAiAnalysisService::new(api_key)
            .with_client(client)
            .with_base_url(base_url)
            .with_model(&config.analysis.model),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.refinement.api_key = "sk-test123".to_string();
        config.generation.api_token = "r8-test123".to_string();
        config
    }

    #[test]
    fn test_validate_missing_refinement_key() {
        let mut config = configured();
        config.refinement.api_key.clear();
        match validate_services_config(&config) {
            Err(ServiceError::Config(msg)) => assert!(msg.contains("Refinement API key")),
            other => panic!("Expected Config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_validate_missing_generation_token() {
        let mut config = configured();
        config.generation.api_token.clear();
        assert!(validate_services_config(&config).is_err());
    }

    #[test]
    fn test_create_services_success() {
        let services = create_services(&configured()).unwrap();
        assert!(services.analysis.is_some());
    }

    #[test]
    fn test_analysis_disabled() {
        let mut config = configured();
        config.analysis.enabled = false;
        let services = create_services(&config).unwrap();
        assert!(services.analysis.is_none());
    }
}

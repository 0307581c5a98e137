use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::{artiself_dir, config_json_path};

const CONFIG_FILE_PATH: &str = "config.toml";

pub const DEFAULT_FALLBACK_IMAGE: &str = "images/example_image.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root for collections and generated images, defaults to ~/.artiself
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Image reference recorded when rendering fails
    #[serde(default = "default_fallback_image")]
    pub fallback_image: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub refinement: RefinementConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// OpenAI-compatible chat endpoint used to refine concepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_refinement_base_url")]
    pub base_url: String,
    #[serde(default = "default_refinement_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

/// Replicate-style prediction endpoint used to render images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_image_size")]
    pub width: u32,
    #[serde(default = "default_image_size")]
    pub height: u32,
}

/// Vision model used to critique the latest image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Falls back to the refinement key when unset
    #[serde(default)]
    pub api_key: Option<String>,
    /// Falls back to the refinement base URL when unset
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_refinement_model")]
    pub model: String,
}

fn default_fallback_image() -> String {
    DEFAULT_FALLBACK_IMAGE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_refinement_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_refinement_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_generation_base_url() -> String {
    "https://api.replicate.com/v1".to_string()
}

fn default_generation_model() -> String {
    "black-forest-labs/flux-schnell".to_string()
}

fn default_image_size() -> u32 {
    512
}

fn default_true() -> bool {
    true
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_refinement_base_url(),
            model: default_refinement_model(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_generation_base_url(),
            model: default_generation_model(),
            width: default_image_size(),
            height: default_image_size(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            model: default_refinement_model(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            fallback_image: default_fallback_image(),
            request_timeout_secs: default_request_timeout_secs(),
            refinement: RefinementConfig::default(),
            generation: GenerationConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Config {
    /// Load `~/.artiself/config.json`, else `./config.toml`, then apply
    /// environment overrides. Unreadable files fall back to defaults.
    pub fn load() -> Self {
        let mut config = Config::default();

        let json_path = config_json_path();
        let toml_path = Path::new(CONFIG_FILE_PATH);
        let source = if json_path.exists() {
            Some(json_path)
        } else if toml_path.exists() {
            Some(toml_path.to_path_buf())
        } else {
            None
        };

        if let Some(path) = source {
            match Self::from_file(&path) {
                Ok(file_config) => {
                    log::info!("Loaded config from {}", path.display());
                    config = file_config;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse a config file; `.toml` files as TOML, anything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// Apply overrides from an environment-like lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ARTISELF_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(image) = lookup("FALLBACK_IMAGE") {
            self.fallback_image = image;
        }
        if let Some(key) = lookup("REFINEMENT_API_KEY") {
            self.refinement.api_key = key;
        }
        if let Some(url) = lookup("REFINEMENT_BASE_URL") {
            self.refinement.base_url = url;
        }
        if let Some(model) = lookup("REFINEMENT_MODEL") {
            self.refinement.model = model;
        }
        if let Some(token) = lookup("REPLICATE_API_TOKEN") {
            self.generation.api_token = token;
        }
        if let Some(model) = lookup("GENERATION_MODEL") {
            self.generation.model = model;
        }
        if let Some(enabled) = lookup("ANALYSIS_ENABLED") {
            self.analysis.enabled = parse_bool_env(&enabled);
        }
        if let Some(model) = lookup("ANALYSIS_MODEL") {
            self.analysis.model = model;
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(artiself_dir)
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir().join("collections")
    }

    pub fn generated_images_dir(&self) -> PathBuf {
        self.data_dir().join("generated_images")
    }
}

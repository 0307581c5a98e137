//! Replicate-style prediction API for text-to-image rendering.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::plain_http_client;
use crate::error::{Result, ServiceError};
use crate::service::GenerationService;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
const DEFAULT_MODEL: &str = "black-forest-labs/flux-schnell";
const MAX_POLLS: usize = 30;

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    /// First output URL; models return either a string or a list.
    fn first_output(&self) -> Option<String> {
        match self.output.as_ref()? {
            Value::String(url) => Some(url.clone()),
            Value::Array(items) => items.iter().find_map(|v| v.as_str().map(String::from)),
            _ => None,
        }
    }
}

pub struct ReplicateGenerationService {
    client: ClientWithMiddleware,
    api_token: String,
    base_url: String,
    model: String,
    width: u32,
    height: u32,
    output_dir: PathBuf,
    poll_interval: Duration,
}

impl ReplicateGenerationService {
    pub fn new(api_token: impl Into<String>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            client: plain_http_client(),
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            width: 512,
            height: 512,
            output_dir: output_dir.as_ref().to_path_buf(),
            poll_interval: Duration::from_secs(1),
        }
    }

    pub fn with_client(mut self, client: ClientWithMiddleware) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn predictions_url(&self) -> String {
        format!(
            "{}/models/{}/predictions",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_token)
    }

    async fn parse_prediction(response: reqwest::Response) -> Result<Prediction> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(ServiceError::Api(format!("HTTP {}: {}", status, text)));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction> {
        let body = json!({
            "input": {
                "prompt": prompt,
                "width": self.width,
                "height": self.height,
                "num_outputs": 1,
            }
        });

        let response = self
            .client
            .post(self.predictions_url())
            .header("Authorization", self.auth_header())
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;
        Self::parse_prediction(response).await
    }

    /// Poll until the prediction reaches a terminal status.
    async fn wait_for(&self, mut prediction: Prediction) -> Result<Prediction> {
        let mut polls = 0;
        while !prediction.is_terminal() {
            let url = prediction
                .urls
                .as_ref()
                .and_then(|urls| urls.get.clone())
                .ok_or_else(|| {
                    ServiceError::Prediction(format!(
                        "prediction is '{}' with no polling URL",
                        prediction.status
                    ))
                })?;

            if polls >= MAX_POLLS {
                return Err(ServiceError::Prediction(format!(
                    "prediction still '{}' after {} polls",
                    prediction.status, MAX_POLLS
                )));
            }
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(url)
                .header("Authorization", self.auth_header())
                .send()
                .await?;
            prediction = Self::parse_prediction(response).await?;
        }
        Ok(prediction)
    }

    async fn download(&self, url: &str) -> Result<PathBuf> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ServiceError::Api(format!(
                "Failed to download image, HTTP {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ServiceError::EmptyResponse("image download".to_string()));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(generated_file_name(url));
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e.into());
        }
        Ok(path)
    }
}

/// `generated_<millis>_<short id>.<ext>`, extension taken from the URL.
fn generated_file_name(url: &str) -> String {
    let ext = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()))
        .filter(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "webp" | "gif"))
        .unwrap_or_else(|| "png".to_string());

    let id = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "generated_{}_{}.{}",
        chrono::Utc::now().timestamp_millis(),
        &id[..8],
        ext
    )
}

#[async_trait]
impl GenerationService for ReplicateGenerationService {
    async fn render(&self, prompt: &str) -> Result<String> {
        let prediction = self.create_prediction(prompt).await?;
        let prediction = self.wait_for(prediction).await?;

        if prediction.status != "succeeded" {
            let reason = prediction
                .error
                .as_ref()
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| prediction.status.clone());
            return Err(ServiceError::Prediction(reason));
        }

        let url = prediction
            .first_output()
            .ok_or_else(|| ServiceError::EmptyResponse("prediction output".to_string()))?;
        log::debug!("Prediction produced image URL: {}", url);

        let path = self.download(&url).await?;
        log::info!("Image saved to {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictions_url() {
        let service = ReplicateGenerationService::new("r8", "/tmp/out")
            .with_base_url("http://localhost:1234/v1/");
        assert_eq!(
            service.predictions_url(),
            "http://localhost:1234/v1/models/black-forest-labs/flux-schnell/predictions"
        );
    }

    #[test]
    fn test_first_output_accepts_string_or_list() {
        let single: Prediction =
            serde_json::from_str(r#"{"status":"succeeded","output":"https://x/a.webp"}"#).unwrap();
        assert_eq!(single.first_output().as_deref(), Some("https://x/a.webp"));

        let list: Prediction =
            serde_json::from_str(r#"{"status":"succeeded","output":["https://x/b.png"]}"#)
                .unwrap();
        assert_eq!(list.first_output().as_deref(), Some("https://x/b.png"));

        let none: Prediction = serde_json::from_str(r#"{"status":"succeeded"}"#).unwrap();
        assert!(none.first_output().is_none());
    }

    #[test]
    fn test_generated_file_name_extension() {
        assert!(generated_file_name("https://x/out-0.webp?sig=1").ends_with(".webp"));
        assert!(generated_file_name("https://x/out").ends_with(".png"));
        assert!(generated_file_name("https://x/out.exe").ends_with(".png"));
        assert!(generated_file_name("https://x/a.png").starts_with("generated_"));
    }

    #[test]
    fn test_generated_file_names_are_unique() {
        let a = generated_file_name("https://x/a.png");
        let b = generated_file_name("https://x/a.png");
        assert_ne!(a, b);
    }
}

//! OpenAI-compatible chat completions, used for refinement and image analysis.

use std::path::Path;

use art_core::Creativity;
use async_trait::async_trait;
use base64::Engine as _;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::plain_http_client;
use crate::error::{Result, ServiceError};
use crate::service::{AnalysisService, RefinementService};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const ANALYSIS_PROMPT: &str = "Analyze this image as a work of art. Describe:\n\
1. The main visual elements and subjects\n\
2. The composition and structure\n\
3. The color palette and lighting\n\
4. The style and technique\n\
5. The mood and emotional impact\n\
6. Areas with potential for artistic development or refinement\n\n\
Provide specific details that would be useful for guiding further artistic iterations.";

const ANALYSIS_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build a non-streaming chat completion body with a single user message.
pub fn build_chat_body(model: &str, content: Value, temperature: f32, max_tokens: u32) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": content }],
        "temperature": temperature,
        "max_tokens": max_tokens,
        "stream": false,
    })
}

/// Extract the first choice's text, rejecting blank output.
fn parse_chat_content(body: &str, source: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ServiceError::EmptyResponse(source.to_string()));
    }
    Ok(text)
}

async fn post_chat(
    client: &ClientWithMiddleware,
    base_url: &str,
    api_key: &str,
    body: &Value,
    source: &str,
) -> Result<String> {
    let mut request = client
        .post(format!("{}/chat/completions", base_url.trim_end_matches('/')))
        .json(body);
    if !api_key.is_empty() {
        request = request.header("Authorization", format!("Bearer {}", api_key));
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await?;
        return Err(ServiceError::Api(format!("HTTP {}: {}", status, text)));
    }

    let text = response.text().await?;
    parse_chat_content(&text, source)
}

pub struct OpenAiRefinementService {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl OpenAiRefinementService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: plain_http_client(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: 500,
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

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

#[async_trait]
impl RefinementService for OpenAiRefinementService {
    async fn refine(&self, prompt: &str, creativity: Creativity) -> Result<String> {
        log::debug!(
            "Refining with model '{}' at {:?} ({} prompt chars)",
            self.model,
            creativity,
            prompt.len()
        );
        let body = build_chat_body(
            &self.model,
            json!(prompt),
            creativity.temperature(),
            self.max_output_tokens,
        );
        post_chat(&self.client, &self.base_url, &self.api_key, &body, "refinement").await
    }
}

pub struct OpenAiAnalysisService {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiAnalysisService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: plain_http_client(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
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
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Remote references pass through; local files are inlined as data URIs.
pub async fn image_url_for(image_reference: &str) -> Result<String> {
    if image_reference.starts_with("http://")
        || image_reference.starts_with("https://")
        || image_reference.starts_with("data:")
    {
        return Ok(image_reference.to_string());
    }

    let path = Path::new(image_reference);
    let bytes = tokio::fs::read(path).await?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime_for(path), encoded))
}

#[async_trait]
impl AnalysisService for OpenAiAnalysisService {
    async fn analyze(&self, image_reference: &str) -> Result<String> {
        let url = image_url_for(image_reference).await?;
        let content = json!([
            { "type": "text", "text": ANALYSIS_PROMPT },
            { "type": "image_url", "image_url": { "url": url } },
        ]);
        let body = build_chat_body(&self.model, content, ANALYSIS_TEMPERATURE, 500);
        post_chat(&self.client, &self.base_url, &self.api_key, &body, "analysis").await
    }
}

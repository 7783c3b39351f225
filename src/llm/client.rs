use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScenarioError};

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable overriding the API root
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite-001";

/// Something that turns a prompt and an instruction into raw model output
pub trait ScenarioGenerator {
    fn generate(
        &self,
        prompt: &str,
        instruction: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Configuration for the Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (from GEMINI_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "gemini-2.0-flash-lite-001")
    pub model: String,
    /// API root, without trailing slash
    pub base_url: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    /// Maximum tokens in response
    pub max_output_tokens: u32,
    /// Overall timeout for a single request
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Create with default generation settings
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.8,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        Self::from_lookup(model, |key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(model: impl Into<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ScenarioError::configuration(format!(
                    "{} not found in environment variables",
                    API_KEY_VAR
                ))
            })?;

        let mut config = Self::new(api_key, model);
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Send a prompt with a system instruction and return the response text
    pub async fn send_message(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user);
        let endpoint = self.config.endpoint();

        debug!("POST {} ({} prompt bytes)", endpoint, user.len());

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ScenarioError::Api { status, body });
        }

        let response: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Token usage: {} prompt, {} candidates",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        response.into_text()
    }

    fn build_request(&self, system: &str, user: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user.to_string(),
                }],
            }],
            generation_config: GenerationSettings {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

impl ScenarioGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, instruction: &str) -> Result<String> {
        self.send_message(instruction, prompt).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationSettings,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ScenarioError::EmptyResponse {
                reason: format!("prompt blocked ({})", reason),
            });
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ScenarioError::EmptyResponse {
                reason: "no candidates".to_string(),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ScenarioError::EmptyResponse {
                reason: format!(
                    "candidate has no text (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(text)
    }
}

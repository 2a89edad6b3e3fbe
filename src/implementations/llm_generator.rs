use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::errors::{ VideoError, VideoResult };
use crate::implementations::config::{ ConfigError, GeneratorConfig };
use crate::models::{ GeneratedArtifact, GenerationRequest };
use crate::traits::scene_generator::SceneCodeGenerator;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")] ApiError(String),

    #[error("Configuration error: {0}")] ConfigError(#[from] ConfigError),

    #[error("Failed to parse API response: {0}")] ParseError(String),

    #[error("Network error: {0}")] NetworkError(String),

    #[error("HTTP error: {status} - {message}")] HttpError {
        status: u16,
        message: String,
    },

    #[error("Empty response from model")] EmptyResponse,
}

impl From<LlmError> for VideoError {
    fn from(err: LlmError) -> Self {
        VideoError::GenerationFailed(err.to_string())
    }
}

/// OpenAI-compatible request and response types
#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Anthropic Messages API types
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    system: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct MessagesContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<MessagesContent>,
}

/// Scene code generator backed by a chat-style LLM API
///
/// # API Keys
/// The key comes from the `api_key` config field, or from the environment:
///    - GitHub Models: GITHUB_TOKEN
///    - OpenAI: OPENAI_API_KEY
///    - Anthropic: ANTHROPIC_API_KEY
///
/// # Usage Example
/// ```rust,no_run
/// use mathreel::{ Difficulty, GenerationRequest, LLMSceneGenerator, Quality };
/// use mathreel::implementations::config::GeneratorConfig;
/// use mathreel::traits::SceneCodeGenerator;
///
/// async fn generate_example() -> Result<(), Box<dyn std::error::Error>> {
///     let generator = LLMSceneGenerator::new(GeneratorConfig::default())?;
///     let request = GenerationRequest::new(
///         "Explain the Pythagorean theorem",
///         Difficulty::Beginner,
///         20,
///         Quality::Low,
///     )?;
///
///     let artifact = generator.generate(&request).await?;
///     println!("{}", artifact.raw_text);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LLMSceneGenerator {
    config: GeneratorConfig,
    http_client: reqwest::Client,
}

impl LLMSceneGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: GeneratorConfig) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(config.request_timeout_secs.unwrap_or(120));
        let http_client = reqwest::Client
            ::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// System and user instructions for a request
    pub fn build_messages(&self, request: &GenerationRequest) -> Result<(String, String), LlmError> {
        let mut params = HashMap::new();
        params.insert("topic".to_string(), request.prompt().to_string());
        params.insert("difficulty".to_string(), request.difficulty().to_string());
        params.insert("duration".to_string(), request.duration_secs().to_string());

        let system = render_template(self.config.get_template("system")?, &params);
        let user = render_template(self.config.get_template("user")?, &params);
        Ok((system, user))
    }

    /// Send a short request to confirm the key and endpoint work
    pub async fn ping(&self) -> Result<String, LlmError> {
        let (content, _) = self.call_llm_api(
            "You are a helpful assistant.",
            "What is 2 + 2?"
        ).await?;
        Ok(content)
    }

    /// Call the LLM API with a system and a user instruction.
    /// Returns the generated text and the model that produced it.
    async fn call_llm_api(&self, system: &str, user: &str) -> Result<(String, String), LlmError> {
        let (provider, api_key) = self.config.get_api_key()?;
        let (api_endpoint, model) = self.config.endpoint_for(&provider);

        let temperature = self.config.temperature.unwrap_or(0.7);
        let max_tokens = self.config.max_tokens.unwrap_or(2000);

        info!("Making LLM API request to {}", provider);
        debug!("API endpoint: {}", api_endpoint);
        debug!("Model: {}", model);
        debug!("Temperature: {}", temperature);
        debug!("Max tokens: {}", max_tokens);
        debug!("Prompt length: {} characters", system.len() + user.len());

        let request_builder = if provider == "anthropic" {
            let body = MessagesRequest {
                model: model.clone(),
                system: system.to_string(),
                messages: vec![ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                }],
                temperature,
                max_tokens,
            };
            self.http_client
                .post(&api_endpoint)
                .header("Content-Type", "application/json")
                .header("x-api-key", &api_key)
                .header("anthropic-version", "2023-06-01")
                .json(&body)
        } else {
            let body = ChatRequest {
                model: model.clone(),
                messages: vec![
                    ChatMessage {
                        role: "system".to_string(),
                        content: system.to_string(),
                    },
                    ChatMessage {
                        role: "user".to_string(),
                        content: user.to_string(),
                    }
                ],
                temperature,
                max_tokens,
            };
            self.http_client
                .post(&api_endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", api_key))
                .json(&body)
        };

        let response = request_builder.send().await.map_err(|e| {
            let error_msg = format!("Network error when calling {} API: {}", provider, e);
            warn!("{}", error_msg);
            if e.is_timeout() {
                warn!("Request timed out");
            }
            if e.is_connect() {
                warn!("Connection error - check network connectivity");
            }
            LlmError::NetworkError(error_msg)
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());

            warn!("API error: HTTP {} - {}", status, error_text);
            return Err(LlmError::HttpError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await.map_err(|e| {
            warn!("Failed to get text from response: {}", e);
            LlmError::ParseError(e.to_string())
        })?;

        info!("Successfully received response from API");
        debug!("Response length: {} characters", response_text.len());

        let content = if provider == "anthropic" {
            parse_messages_response(&response_text)?
        } else {
            parse_chat_response(&response_text)?
        };

        Ok((content, model))
    }
}

/// Replace `{{key}}` placeholders with their values
pub fn render_template(template: &str, params: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

/// Extract the first choice's content from an OpenAI-style response
pub(crate) fn parse_chat_response(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json
        ::from_str(body)
        .map_err(|e| LlmError::ParseError(format!("Invalid JSON response: {}", e)))?;

    let choice = response.choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ApiError("No response from API".to_string()))?;

    Ok(choice.message.content.unwrap_or_default())
}

/// Join the text blocks of an Anthropic Messages response
pub(crate) fn parse_messages_response(body: &str) -> Result<String, LlmError> {
    let response: MessagesResponse = serde_json
        ::from_str(body)
        .map_err(|e| LlmError::ParseError(format!("Invalid JSON response: {}", e)))?;

    Ok(
        response.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n")
    )
}

#[async_trait]
impl SceneCodeGenerator for LLMSceneGenerator {
    async fn generate(&self, request: &GenerationRequest) -> VideoResult<GeneratedArtifact> {
        info!("Generating scene code for: {}", request.prompt());

        let (system, user) = self.build_messages(request)?;
        let (content, model) = self.call_llm_api(&system, &user).await?;

        let raw_text = content.trim().to_string();
        if raw_text.is_empty() {
            warn!("Model returned an empty answer");
            return Err(LlmError::EmptyResponse.into());
        }

        debug!("Generated {} characters of scene code", raw_text.len());
        Ok(GeneratedArtifact {
            raw_text,
            model: Some(model),
        })
    }
}

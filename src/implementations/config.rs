use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),

    #[error("Missing prompt template: {0}")]
    MissingTemplate(String),
}

/// Known LLM providers and the environment variable holding each one's key
pub const PROVIDER_KEYS: [(&str, &str); 3] = [
    ("github", "GITHUB_TOKEN"),
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
];

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Preferred provider (github, openai, anthropic)
    pub provider: String,

    /// API key for LLM service
    pub api_key: Option<String>,

    /// API endpoint for LLM service
    pub api_endpoint: Option<String>,

    /// API model to use
    pub model: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            provider: "github".to_string(),
            api_key: None,
            api_endpoint: None,
            model: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Configuration for the LLM that writes the scene code
    pub llm_api: ApiConfig,

    /// Prompt templates keyed by role ("system", "user")
    pub prompt_templates: HashMap<String, String>,

    /// Maximum tokens for API calls
    pub max_tokens: Option<usize>,

    /// Temperature for generation (0.0-1.0)
    pub temperature: Option<f32>,

    /// HTTP timeout for a single generation request
    pub request_timeout_secs: Option<u64>,
}

impl GeneratorConfig {
    /// Get the API key, checking environment variables if not in config.
    /// If the preferred provider's key is not set, other providers are tried.
    pub fn get_api_key(&self) -> Result<(String, String), ConfigError> {
        use log::{ debug, info };

        let preferred_provider = self.llm_api.provider.to_lowercase();

        if let Some(api_key) = &self.llm_api.api_key {
            debug!("Using API key from config");
            return Ok((preferred_provider, api_key.clone()));
        }

        if let Some((_, env_var)) = PROVIDER_KEYS.iter().find(|(p, _)| *p == preferred_provider) {
            match std::env::var(env_var) {
                Ok(key) if !key.trim().is_empty() => {
                    info!("Using preferred provider: {}", preferred_provider);
                    return Ok((preferred_provider, key));
                }
                _ => {
                    debug!("Preferred provider {} not available, trying others", preferred_provider);
                }
            }
        } else {
            debug!("Unknown provider: {}, will try known providers", preferred_provider);
        }

        for (provider, env_var) in PROVIDER_KEYS {
            if provider == preferred_provider {
                continue;
            }
            match std::env::var(env_var) {
                Ok(key) if !key.trim().is_empty() => {
                    info!(
                        "Using alternative provider: {} (preferred was {})",
                        provider,
                        preferred_provider
                    );
                    return Ok((provider.to_string(), key));
                }
                _ => {
                    debug!("Provider {} not available", provider);
                }
            }
        }

        Err(
            ConfigError::MissingApiKey(
                "No API keys found for any provider (set GITHUB_TOKEN, OPENAI_API_KEY or ANTHROPIC_API_KEY)".to_string()
            )
        )
    }

    /// Get the template for a specific role
    pub fn get_template(&self, template_name: &str) -> Result<&str, ConfigError> {
        self.prompt_templates
            .get(template_name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingTemplate(template_name.to_string()))
    }

    /// Endpoint and model for a provider, honouring overrides from the config
    pub fn endpoint_for(&self, provider: &str) -> (String, String) {
        let (default_endpoint, default_model) = match provider {
            "openai" => ("https://api.openai.com/v1/chat/completions", "gpt-4o"),
            "anthropic" => ("https://api.anthropic.com/v1/messages", "claude-3-5-sonnet-20241022"),
            _ => ("https://models.github.ai/inference/chat/completions", "openai/gpt-4o"),
        };

        // Overrides only apply to the provider they were written for
        let same_provider = self.llm_api.provider.eq_ignore_ascii_case(provider);
        let endpoint = self.llm_api.api_endpoint
            .clone()
            .filter(|_| same_provider)
            .unwrap_or_else(|| default_endpoint.to_string());
        let model = self.llm_api.model
            .clone()
            .filter(|_| same_provider)
            .unwrap_or_else(|| default_model.to_string());

        (endpoint, model)
    }
}

/// Default configuration
impl Default for GeneratorConfig {
    fn default() -> Self {
        let mut prompt_templates = HashMap::new();
        prompt_templates.insert(
            "system".to_string(),
            r#"You are an expert in mathematical visualization and Manim (Mathematical Animation Engine).

Your task is to generate complete, executable Manim code that creates educational math videos.

Guidelines:
1. Create a class that inherits from Scene
2. Use proper Manim imports and syntax
3. Include clear mathematical explanations as text animations
4. Use appropriate colors, scaling, and positioning
5. Add smooth transitions and animations
6. Target duration: approximately {{duration}} seconds
7. Difficulty level: {{difficulty}}
8. Make the visualization engaging and educational
9. Include step-by-step explanations
10. Use proper mathematical notation with MathTex when needed

Return ONLY the Python code without any markdown formatting or explanations."#.to_string(),
        );
        prompt_templates.insert(
            "user".to_string(),
            r#"Create a Manim animation that explains and visualizes: {{topic}}

The animation should:
- Start with an introduction to the concept
- Show step-by-step mathematical derivations or examples
- Use visual elements like graphs, equations, geometric shapes as appropriate
- End with a summary or key takeaway
- Be suitable for {{difficulty}} level students"#.to_string(),
        );

        GeneratorConfig {
            llm_api: ApiConfig::default(),
            prompt_templates,
            max_tokens: Some(2000),
            temperature: Some(0.7),
            request_timeout_secs: Some(120),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RendererConfig {
    /// Renderer executable
    pub program: String,

    /// Arguments placed before the scene path (e.g. the `render` subcommand)
    pub base_args: Vec<String>,

    /// Extension of the persisted scene source
    pub scene_extension: String,

    /// Codec tool the renderer shells out to
    pub codec_tool: String,

    /// Directories prepended to the renderer's PATH when they exist
    pub extra_path_dirs: Vec<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let mut extra_path_dirs = vec![PathBuf::from("ffmpeg").join("bin"), PathBuf::from("ffmpeg")];
        if cfg!(windows) {
            extra_path_dirs.extend([
                PathBuf::from("C:\\ffmpeg\\bin"),
                PathBuf::from("C:\\Program Files\\ffmpeg\\bin"),
                PathBuf::from("C:\\Program Files (x86)\\ffmpeg\\bin"),
            ]);
        }

        RendererConfig {
            program: "manim".to_string(),
            base_args: vec!["render".to_string()],
            scene_extension: "py".to_string(),
            codec_tool: "ffmpeg".to_string(),
            extra_path_dirs,
        }
    }
}

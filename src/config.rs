use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenAI-compatible chat completion API key
    pub openai_api_key: String,

    /// Chat completion API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// SearchAPI.io key for shopping/web search
    pub searchapi_api_key: String,

    /// Search endpoint URL
    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,

    /// Hugging Face inference API key
    pub huggingface_api_key: String,

    /// Hugging Face inference base URL
    #[serde(default = "default_huggingface_api_url")]
    pub huggingface_api_url: String,

    /// Model used whenever at least one image is attached
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Cheaper model used for text-only requests
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Text-to-image model identifier
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Timeout applied to every outbound call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Fetch product pages and ask the model for the main product image
    #[serde(default = "default_infer_thumbnails")]
    pub infer_thumbnails: bool,

    /// Root directory for per-request photo uploads
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_search_api_url() -> String {
    "https://www.searchapi.io/api/v1/search".to_string()
}

fn default_huggingface_api_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "black-forest-labs/FLUX.1-dev".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_infer_thumbnails() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Fails when any provider key is missing or blank, so the service refuses to
    /// start instead of failing on every request.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from explicit key/value pairs (same names as the environment)
    pub fn from_pairs<I>(pairs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(pairs)
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        let required = [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("SEARCHAPI_API_KEY", &self.searchapi_api_key),
            ("HUGGINGFACE_API_KEY", &self.huggingface_api_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} is set but empty", name)));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config(
                "HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Directory under which each request gets its own upload folder
    pub fn temp_root(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("lookbook-api"))
    }
}

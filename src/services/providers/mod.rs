//! External API provider abstractions
//!
//! Every third-party API the service talks to sits behind one of these traits. Handles
//! are constructed once at startup and injected into the components that need them,
//! so tests can swap in mocks without touching process-wide state.
use crate::{error::AppResult, models::SearchApiResponse, services::messages::ChatMessage};

pub mod huggingface;
pub mod openai;
pub mod searchapi;
pub mod web_page;

pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;
pub use searchapi::SearchApiProvider;
pub use web_page::HttpPageFetcher;

/// A fully specified chat completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat/vision completion endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the raw text of the first choice
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}

/// Shopping/web search endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<SearchApiResponse>;
}

/// Fetches product pages for thumbnail inference
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> AppResult<String>;
}

/// Text-to-image endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    /// Returns the encoded image bytes
    async fn text_to_image(&self, prompt: &str) -> AppResult<Vec<u8>>;
}

/// Shortens provider error bodies before they end up in logs or error messages
pub(crate) fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

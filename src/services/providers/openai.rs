//! OpenAI-compatible chat completion provider
//!
//! Sends role-tagged messages (text or inline base64 images) to `/chat/completions`
//! and returns the first choice's text.
use crate::{
    error::{AppError, AppResult},
    services::{
        messages::ChatMessage,
        providers::{truncate_for_log, CompletionProvider, CompletionRequest},
    },
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "openai";
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OpenAiProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }

    fn extract_content(response: ChatCompletionResponse) -> AppResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| AppError::upstream(PROVIDER, "response contained no message content"))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(
                PROVIDER,
                format!(
                    "API returned status {}: {}",
                    status,
                    truncate_for_log(&body, ERROR_BODY_LIMIT)
                ),
            ));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = Self::extract_content(completion)?;

        tracing::debug!(
            model = %request.model,
            chars = content.len(),
            provider = PROVIDER,
            "Completion received"
        );

        Ok(content)
    }
}

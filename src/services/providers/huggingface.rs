//! Hugging Face inference text-to-image provider
use crate::{
    error::{AppError, AppResult},
    services::providers::{truncate_for_log, ImageProvider},
};
use reqwest::{header::CONTENT_TYPE, Client as HttpClient};
use serde_json::json;

const PROVIDER: &str = "huggingface";
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Clone)]
pub struct HuggingFaceProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.api_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait::async_trait]
impl ImageProvider for HuggingFaceProvider {
    async fn text_to_image(&self, prompt: &str) -> AppResult<Vec<u8>> {
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        // The endpoint reports model errors (loading, quota) as JSON bodies
        if !status.is_success() || is_json {
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

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::upstream(PROVIDER, "empty image body"));
        }

        tracing::info!(
            model = %self.model,
            bytes = bytes.len(),
            provider = PROVIDER,
            "Image generated"
        );

        Ok(bytes.to_vec())
    }
}

use std::sync::Arc;

use crate::{
    error::AppResult,
    services::{
        messages::AssembledRequest,
        providers::{CompletionProvider, CompletionRequest},
    },
};

const PROVIDER: &str = "completion";

/// Sampling settings for one kind of completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Which model to use with and without image attachments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub vision_model: String,
    pub text_model: String,
}

impl ModelSelection {
    pub fn new(vision_model: impl Into<String>, text_model: impl Into<String>) -> Self {
        Self {
            vision_model: vision_model.into(),
            text_model: text_model.into(),
        }
    }

    /// Any attached image forces the vision-capable model
    pub fn select(&self, has_attachments: bool) -> &str {
        if has_attachments {
            &self.vision_model
        } else {
            &self.text_model
        }
    }
}

/// Sends assembled messages to the completion provider
///
/// All provider failures come back as `AppError::Upstream`.
#[derive(Clone)]
pub struct CompletionInvoker {
    provider: Arc<dyn CompletionProvider>,
    models: ModelSelection,
}

impl CompletionInvoker {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: ModelSelection) -> Self {
        Self { provider, models }
    }

    pub async fn invoke(
        &self,
        task: &'static str,
        settings: CompletionSettings,
        request: AssembledRequest,
    ) -> AppResult<String> {
        let model = self.models.select(request.has_attachments()).to_string();

        tracing::info!(
            task,
            model = %model,
            images = request.image_count,
            temperature = settings.temperature,
            "Upstream completion call issued"
        );

        let result = self
            .provider
            .complete(CompletionRequest {
                model,
                messages: request.messages,
                temperature: settings.temperature,
                max_tokens: settings.max_tokens,
            })
            .await
            .map_err(|e| e.into_upstream(PROVIDER));

        if let Err(e) = &result {
            tracing::warn!(task, error = %e, "Upstream completion call failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::messages::assemble;
    use crate::services::providers::MockCompletionProvider;

    const SETTINGS: CompletionSettings = CompletionSettings {
        temperature: 0.7,
        max_tokens: 800,
    };

    fn models() -> ModelSelection {
        ModelSelection::new("vision-model", "text-model")
    }

    #[test]
    fn test_select_model() {
        let models = models();
        assert_eq!(models.select(true), "vision-model");
        assert_eq!(models.select(false), "text-model");
    }

    #[tokio::test]
    async fn test_text_only_request_uses_text_model() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .withf(|req| req.model == "text-model" && req.max_tokens == 800)
            .times(1)
            .returning(|_| Ok("ok".to_string()));

        let invoker = CompletionInvoker::new(Arc::new(provider), models());
        let text = invoker
            .invoke("test", SETTINGS, assemble("sys", "prompt", &[], &[]))
            .await
            .unwrap();

        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_single_image_forces_vision_model() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .withf(|req| req.model == "vision-model" && (req.temperature - 0.7).abs() < f32::EPSILON)
            .times(1)
            .returning(|_| Ok("ok".to_string()));

        let invoker = CompletionInvoker::new(Arc::new(provider), models());
        let aesthetic = vec![b"look".to_vec()];
        let result = invoker
            .invoke("test", SETTINGS, assemble("sys", "prompt", &[], &aesthetic))
            .await;

        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_upstream() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));

        let invoker = CompletionInvoker::new(Arc::new(provider), models());
        let err = invoker
            .invoke("test", SETTINGS, assemble("sys", "prompt", &[], &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream { provider: "completion", .. }));
    }
}

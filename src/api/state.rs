use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    services::{
        providers::{
            CompletionProvider, HttpPageFetcher, HuggingFaceProvider, ImageProvider,
            OpenAiProvider, PageFetcher, SearchApiProvider, SearchProvider,
        },
        CompletionInvoker, ImageDerivationService, ModelSelection, ProductSearchAdapter,
        RecommendationPipeline, RecommendationService, ThumbnailInference,
    },
};

/// Provider handles injected into the service graph
#[derive(Clone)]
pub struct Providers {
    pub completion: Arc<dyn CompletionProvider>,
    pub search: Arc<dyn SearchProvider>,
    /// `None` disables thumbnail inference
    pub pages: Option<Arc<dyn PageFetcher>>,
    pub image: Arc<dyn ImageProvider>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    recommendations: RecommendationService,
    temp_root: PathBuf,
}

impl AppState {
    /// Builds the real provider clients from configuration
    ///
    /// All outbound calls share one HTTP client carrying the configured timeout.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        let pages: Option<Arc<dyn PageFetcher>> = if config.infer_thumbnails {
            Some(Arc::new(HttpPageFetcher::new(http_client.clone())))
        } else {
            None
        };

        let providers = Providers {
            completion: Arc::new(OpenAiProvider::new(
                http_client.clone(),
                config.openai_api_key.clone(),
                config.openai_api_url.clone(),
            )),
            search: Arc::new(SearchApiProvider::new(
                http_client.clone(),
                config.searchapi_api_key.clone(),
                config.search_api_url.clone(),
            )),
            pages,
            image: Arc::new(HuggingFaceProvider::new(
                http_client,
                config.huggingface_api_key.clone(),
                config.huggingface_api_url.clone(),
                config.image_model.clone(),
            )),
        };

        Ok(Self::with_providers(
            providers,
            ModelSelection::new(config.vision_model.clone(), config.text_model.clone()),
            config.temp_root(),
        ))
    }

    /// Wires the service graph around the given providers
    pub fn with_providers(providers: Providers, models: ModelSelection, temp_root: PathBuf) -> Self {
        let invoker = CompletionInvoker::new(providers.completion, models);
        let thumbnails = providers
            .pages
            .map(|pages| ThumbnailInference::new(pages, invoker.clone()));

        let recommendations = RecommendationService::new(
            RecommendationPipeline::new(invoker),
            ProductSearchAdapter::new(providers.search, thumbnails),
            ImageDerivationService::new(providers.image),
        );

        Self {
            inner: Arc::new(AppStateInner {
                recommendations,
                temp_root,
            }),
        }
    }

    pub fn recommendations(&self) -> &RecommendationService {
        &self.inner.recommendations
    }

    pub fn temp_root(&self) -> &Path {
        &self.inner.temp_root
    }
}

//! SearchAPI.io shopping/web search provider
//!
//! Issues a Google-engine search for one query and returns the raw result lists;
//! mapping into product records happens in the search adapter.
use crate::{
    error::{AppError, AppResult},
    models::SearchApiResponse,
    services::providers::{truncate_for_log, SearchProvider},
};
use reqwest::Client as HttpClient;

const PROVIDER: &str = "searchapi";
const SEARCH_ENGINE: &str = "google";
const SEARCH_DOMAIN: &str = "google.com";
const SEARCH_COUNTRY: &str = "us";
const SEARCH_LANGUAGE: &str = "en";
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Clone)]
pub struct SearchApiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl SearchApiProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    fn query_params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("engine", SEARCH_ENGINE.to_string()),
            ("q", format!("{} shopping", query.trim())),
            ("google_domain", SEARCH_DOMAIN.to_string()),
            ("gl", SEARCH_COUNTRY.to_string()),
            ("hl", SEARCH_LANGUAGE.to_string()),
            ("api_key", self.api_key.clone()),
        ]
    }
}

#[async_trait::async_trait]
impl SearchProvider for SearchApiProvider {
    async fn search(&self, query: &str) -> AppResult<SearchApiResponse> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&self.query_params(query))
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

        let data: SearchApiResponse = response.json().await?;

        if let Some(error) = &data.error {
            return Err(AppError::upstream(PROVIDER, error.clone()));
        }

        tracing::info!(
            query = %query,
            organic = data.organic_results.len(),
            shopping = data.shopping_results.len(),
            provider = PROVIDER,
            "Search completed"
        );

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> SearchApiProvider {
        SearchApiProvider::new(
            reqwest::Client::new(),
            "test_key".to_string(),
            "http://test.local/api/v1/search".to_string(),
        )
    }

    #[test]
    fn test_query_params() {
        let provider = create_test_provider();
        let params = provider.query_params(" olive crew neck tee ");

        assert!(params.contains(&("q", "olive crew neck tee shopping".to_string())));
        assert!(params.contains(&("engine", "google".to_string())));
        assert!(params.contains(&("gl", "us".to_string())));
        assert!(params.contains(&("api_key", "test_key".to_string())));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_request() {
        let provider = create_test_provider();
        let result = provider.search("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_expose_api_key() {
        use axum::response::IntoResponse;

        let provider = SearchApiProvider::new(
            reqwest::Client::new(),
            "SECRET_SEARCH_KEY".to_string(),
            "http://127.0.0.1:1/api/v1/search".to_string(),
        );

        let err = provider.search("linen shirt").await.unwrap_err();
        assert!(!err.to_string().contains("SECRET_SEARCH_KEY"));

        assert!(matches!(err, AppError::HttpClient(_)));

        let upstream = err.into_upstream(PROVIDER);
        assert!(!upstream.to_string().contains("SECRET_SEARCH_KEY"));

        let response = upstream.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("SECRET_SEARCH_KEY"));
    }
}

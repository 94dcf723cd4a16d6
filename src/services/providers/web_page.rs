//! Product page fetcher used for thumbnail inference
use crate::{
    error::{AppError, AppResult},
    services::providers::PageFetcher,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client as HttpClient,
};

const PROVIDER: &str = "product_page";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

#[derive(Clone)]
pub struct HttpPageFetcher {
    http_client: HttpClient,
}

impl HttpPageFetcher {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_html(&self, url: &str) -> AppResult<String> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::InvalidInput(format!(
                "Not an http(s) URL: {}",
                url
            )));
        }

        let response = self
            .http_client
            .get(url)
            .headers(Self::browser_headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::upstream(
                PROVIDER,
                format!("page returned status {}", response.status()),
            ));
        }

        Ok(response.text().await?)
    }
}

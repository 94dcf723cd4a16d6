use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        CategorizedResults, ProductRecord, RichSnippet, SearchApiResult, SearchQuerySet,
    },
    services::{
        completion::{CompletionInvoker, CompletionSettings},
        messages::assemble,
        providers::{PageFetcher, SearchProvider},
    },
};

/// Hits kept per query (organic first, then shopping)
pub const MAX_RESULTS_PER_QUERY: usize = 5;

const NO_PRICE: &str = "N/A";
const CURRENCY_SYMBOLS: [char; 2] = ['$', '£'];

const PAGE_EXCERPT_CHARS: usize = 15_000;
const THUMBNAIL_TASK: &str = "thumbnail_inference";
const THUMBNAIL_SETTINGS: CompletionSettings = CompletionSettings {
    temperature: 0.1,
    max_tokens: 100,
};
const THUMBNAIL_SYSTEM_PROMPT: &str =
    "You extract the main product image URL from e-commerce product page HTML.";

/// Finds the primary product image on a product page with a text-only completion
#[derive(Clone)]
pub struct ThumbnailInference {
    pages: Arc<dyn PageFetcher>,
    invoker: CompletionInvoker,
}

impl ThumbnailInference {
    pub fn new(pages: Arc<dyn PageFetcher>, invoker: CompletionInvoker) -> Self {
        Self { pages, invoker }
    }

    /// Returns `None` when the model's answer is not an absolute URL
    pub async fn infer_image_url(&self, product_url: &str) -> AppResult<Option<String>> {
        let html = self.pages.fetch_html(product_url).await?;
        let prompt = format!(
            "Given this HTML from a product page, identify the URL of the main product image.\nReturn ONLY the full image URL, nothing else.\n\nHTML:\n{}",
            page_excerpt(&html)
        );

        let answer = self
            .invoker
            .invoke(
                THUMBNAIL_TASK,
                THUMBNAIL_SETTINGS,
                assemble(THUMBNAIL_SYSTEM_PROMPT, &prompt, &[], &[]),
            )
            .await?;

        Ok(clean_image_url(&answer))
    }
}

fn page_excerpt(html: &str) -> &str {
    match html.char_indices().nth(PAGE_EXCERPT_CHARS) {
        Some((idx, _)) => &html[..idx],
        None => html,
    }
}

fn clean_image_url(answer: &str) -> Option<String> {
    let url = answer.trim().trim_matches('"').trim();
    (url.starts_with("http://") || url.starts_with("https://")).then(|| url.to_string())
}

/// First rich-snippet extension carrying a currency symbol, verbatim
pub fn extract_price(rich_snippet: Option<&RichSnippet>) -> String {
    rich_snippet
        .and_then(|snippet| {
            snippet
                .text_extensions()
                .find(|ext| ext.contains(&CURRENCY_SYMBOLS[..]))
        })
        .unwrap_or(NO_PRICE)
        .to_string()
}

/// Maps search hits into product records and fans queries out concurrently
#[derive(Clone)]
pub struct ProductSearchAdapter {
    search: Arc<dyn SearchProvider>,
    thumbnails: Option<ThumbnailInference>,
}

impl ProductSearchAdapter {
    pub fn new(search: Arc<dyn SearchProvider>, thumbnails: Option<ThumbnailInference>) -> Self {
        Self { search, thumbnails }
    }

    /// Searches one query and maps up to five hits
    pub async fn search(&self, query: &str) -> AppResult<Vec<ProductRecord>> {
        let response = self.search.search(query).await?;
        let hits = response.combined(MAX_RESULTS_PER_QUERY);

        let mut products = Vec::with_capacity(hits.len());
        for hit in hits {
            products.push(self.to_product(hit).await);
        }

        tracing::debug!(query, products = products.len(), "Query mapped to products");

        Ok(products)
    }

    async fn to_product(&self, hit: SearchApiResult) -> ProductRecord {
        let product_url = hit
            .link
            .clone()
            .or_else(|| hit.product_link.clone())
            .unwrap_or_default();
        let thumbnail_url = self.resolve_thumbnail(&product_url, hit.thumbnail.as_deref()).await;

        ProductRecord {
            description: hit.snippet.or(hit.title).unwrap_or_default(),
            price: extract_price(hit.rich_snippet.as_ref()),
            thumbnail_url,
            product_url,
        }
    }

    /// Inferred page image, else the provider thumbnail, else empty
    async fn resolve_thumbnail(&self, product_url: &str, provided: Option<&str>) -> String {
        if let Some(inference) = self.thumbnails.as_ref().filter(|_| !product_url.is_empty()) {
            match inference.infer_image_url(product_url).await {
                Ok(Some(url)) => return url,
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(product_url, error = %e, "Thumbnail inference failed");
                }
            }
        }

        provided.unwrap_or_default().to_string()
    }

    /// Runs every query concurrently and groups the results by category
    ///
    /// A failed query contributes an empty list; the aggregate never fails.
    pub async fn search_all(&self, queries: &SearchQuerySet) -> CategorizedResults {
        tracing::info!(query_count = queries.len(), "Fetching products for queries");

        let mut tasks = Vec::new();

        for (category, query) in queries.iter() {
            let adapter = self.clone();
            let query = query.to_string();
            let task = tokio::spawn(async move { adapter.search(&query).await });
            tasks.push((category, task));
        }

        let mut results = CategorizedResults::new();
        let mut error_count = 0;

        for (category, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(AppError::Internal(e.to_string())),
            };

            match outcome {
                Ok(products) => results.extend(category, products),
                Err(e) => {
                    tracing::warn!(category = %category, error = %e, "Product search failed for query");
                    error_count += 1;
                    results.extend(category, Vec::new());
                }
            }
        }

        if error_count > 0 {
            tracing::warn!(
                success_count = queries.len() - error_count,
                error_count,
                "Partial product search failure"
            );
        }

        tracing::info!(
            categories = results.len(),
            products = results.total_products(),
            "Product search completed"
        );

        results
    }
}

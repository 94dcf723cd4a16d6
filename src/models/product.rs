use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::SearchCategory;

/// A product found for a generated query
///
/// `price` is kept exactly as the provider wrote it (or "N/A").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub description: String,
    pub price: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
    #[serde(rename = "productURL")]
    pub product_url: String,
}

/// Products grouped by the category whose query produced them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedResults(BTreeMap<SearchCategory, Vec<ProductRecord>>);

impl CategorizedResults {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Appends products to a category, creating the entry if needed
    pub fn extend(&mut self, category: SearchCategory, products: Vec<ProductRecord>) {
        self.0.entry(category).or_default().extend(products);
    }

    pub fn get(&self, category: SearchCategory) -> Option<&[ProductRecord]> {
        self.0.get(&category).map(Vec::as_slice)
    }

    pub fn total_products(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// SearchAPI Types
// ============================================================================

/// Raw response from the shopping/web search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchApiResponse {
    #[serde(default)]
    pub organic_results: Vec<SearchApiResult>,
    #[serde(default)]
    pub shopping_results: Vec<SearchApiResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchApiResponse {
    /// Organic results followed by shopping results, capped at `limit`
    pub fn combined(self, limit: usize) -> Vec<SearchApiResult> {
        self.organic_results
            .into_iter()
            .chain(self.shopping_results)
            .take(limit)
            .collect()
    }
}

/// One loosely-structured search hit (organic or shopping)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchApiResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub product_link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub rich_snippet: Option<RichSnippet>,
}

/// Provider metadata attached to a hit (ratings, price, delivery...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichSnippet {
    #[serde(default)]
    pub extensions: Vec<serde_json::Value>,
}

impl RichSnippet {
    /// Extension entries that are plain strings
    pub fn text_extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().filter_map(|ext| ext.as_str())
    }
}

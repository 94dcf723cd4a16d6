use std::sync::Arc;

use crate::{
    error::AppResult,
    models::StyleRecommendation,
    services::{messages::data_uri, providers::ImageProvider},
};

/// Renders the text-to-image prompt for a recommendation
pub fn render_prompt(rec: &StyleRecommendation) -> String {
    let items = rec
        .items
        .iter()
        .map(|item| item.description.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "A fashion outfit in {} style. {}. The outfit includes: {}. Style tags: {}.",
        rec.style.title,
        rec.style.description.trim_end_matches('.'),
        items,
        rec.style.tags.join(", ")
    )
}

/// Generates a preview image for a style recommendation
///
/// Single attempt; provider failures are returned to the caller.
#[derive(Clone)]
pub struct ImageDerivationService {
    provider: Arc<dyn ImageProvider>,
}

impl ImageDerivationService {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, rec: &StyleRecommendation) -> AppResult<Vec<u8>> {
        let prompt = render_prompt(rec);
        tracing::info!(style = %rec.style.title, "Generating style image");
        self.provider.text_to_image(&prompt).await
    }

    /// Same as [`generate`](Self::generate), encoded as a data URI
    pub async fn generate_data_uri(&self, rec: &StyleRecommendation) -> AppResult<String> {
        let bytes = self.generate(rec).await?;
        Ok(data_uri(&bytes))
    }
}

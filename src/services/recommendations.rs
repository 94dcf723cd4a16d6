use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        CategorizedResults, ProductRecord, SearchQuerySet, StyleRecommendation, UserAttributes,
        UserPreferences,
    },
    services::{
        imagery::ImageDerivationService,
        pipeline::{PhotoSet, RecommendationPipeline},
        search::ProductSearchAdapter,
    },
};

/// Generated queries together with the products they found
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecommendations {
    pub search_queries_used: SearchQuerySet,
    pub recommendations: CategorizedResults,
}

/// A style recommendation plus whatever photo analysis fed into it
#[derive(Debug, Clone, Serialize)]
pub struct StyleOutcome {
    #[serde(flatten)]
    pub recommendation: StyleRecommendation,
    pub user_attributes: Option<UserAttributes>,
}

/// Orchestrates the recommendation flows
///
/// Photo analysis runs first when profile photos are present, and its result is fed
/// into the prompts of the main task. Completion failures never surface here; the
/// pipeline substitutes fallbacks. Only local I/O problems and the direct search and
/// image operations return errors.
#[derive(Clone)]
pub struct RecommendationService {
    pipeline: RecommendationPipeline,
    search: ProductSearchAdapter,
    imagery: ImageDerivationService,
}

impl RecommendationService {
    pub fn new(
        pipeline: RecommendationPipeline,
        search: ProductSearchAdapter,
        imagery: ImageDerivationService,
    ) -> Self {
        Self {
            pipeline,
            search,
            imagery,
        }
    }

    /// Attribute analysis over the profile photos, skipped when there are none
    async fn analyze_attributes(
        &self,
        prefs: &UserPreferences,
        photos: &PhotoSet,
    ) -> Option<UserAttributes> {
        if photos.profile.is_empty() {
            return None;
        }

        let attrs: UserAttributes = self.pipeline.run(prefs, None, photos).await;
        (!attrs.is_empty()).then_some(attrs)
    }

    /// Category queries from the model, then a concurrent product search per query
    pub async fn product_recommendations(
        &self,
        prefs: &UserPreferences,
    ) -> AppResult<ProductRecommendations> {
        let photos = PhotoSet::load(prefs).await?;
        let attrs = self.analyze_attributes(prefs, &photos).await;

        let queries: SearchQuerySet = self.pipeline.run(prefs, attrs.as_ref(), &photos).await;
        tracing::info!(queries = queries.len(), "Search queries resolved");

        let recommendations = self.search.search_all(&queries).await;

        Ok(ProductRecommendations {
            search_queries_used: queries,
            recommendations,
        })
    }

    /// Structured style recommendation, optionally with a generated preview image
    pub async fn style_recommendation(
        &self,
        prefs: &UserPreferences,
        include_image: bool,
    ) -> AppResult<StyleOutcome> {
        let photos = PhotoSet::load(prefs).await?;
        let attrs = self.analyze_attributes(prefs, &photos).await;

        let mut recommendation: StyleRecommendation =
            self.pipeline.run(prefs, attrs.as_ref(), &photos).await;

        if include_image {
            match self.imagery.generate_data_uri(&recommendation).await {
                Ok(uri) => recommendation.style.image = Some(uri),
                Err(e) => {
                    tracing::warn!(error = %e, "Style image generation failed, returning without image");
                }
            }
        }

        Ok(StyleOutcome {
            recommendation,
            user_attributes: attrs,
        })
    }

    /// Direct product search for a single query
    pub async fn search_products(&self, query: &str) -> AppResult<Vec<ProductRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let products = self.search.search(query).await?;
        if products.is_empty() {
            return Err(AppError::NotFound(format!(
                "No results found for '{}'",
                query
            )));
        }

        Ok(products)
    }

    pub async fn generate_image(&self, rec: &StyleRecommendation) -> AppResult<Vec<u8>> {
        self.imagery
            .generate(rec)
            .await
            .map_err(|e| e.into_upstream("image_generation"))
    }
}

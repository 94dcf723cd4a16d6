use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{CategorizedResults, ProductRecord, SearchQuerySet, StyleRecommendation},
    services::StyleOutcome,
};

use super::{upload, AppState};

// Request/Response types

#[derive(Debug, Serialize)]
pub struct ProductRecommendationResponse {
    pub success: bool,
    pub search_queries_used: SearchQuerySet,
    pub recommendations: CategorizedResults,
}

#[derive(Debug, Serialize)]
pub struct StyleResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: StyleOutcome,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ProductRecord>,
}

// Handlers

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Lookbook fashion recommendation API" }))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Product recommendations from a multipart form
///
/// Also served at the legacy `/api/fashion-search` path.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ProductRecommendationResponse>> {
    let form = upload::read_form(multipart?, state.temp_root()).await?;
    tracing::info!(
        request_id = %request_id,
        has_text = form.preferences.has_text_preferences(),
        profile_photos = form.preferences.profile_photos.len(),
        aesthetic_photos = form.preferences.aesthetic_photos.len(),
        budget = %form.preferences.budget,
        "Request received: product recommendations"
    );

    let result = state
        .recommendations()
        .product_recommendations(&form.preferences)
        .await?;

    tracing::info!(
        request_id = %request_id,
        categories = result.recommendations.len(),
        products = result.recommendations.total_products(),
        "Product recommendations ready"
    );

    // `form` drops here, removing the uploaded photos
    Ok(Json(ProductRecommendationResponse {
        success: true,
        search_queries_used: result.search_queries_used,
        recommendations: result.recommendations,
    }))
}

/// Structured style recommendation from a multipart form
pub async fn style(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<StyleResponse>> {
    let form = upload::read_form(multipart?, state.temp_root()).await?;
    tracing::info!(
        request_id = %request_id,
        has_text = form.preferences.has_text_preferences(),
        profile_photos = form.preferences.profile_photos.len(),
        aesthetic_photos = form.preferences.aesthetic_photos.len(),
        include_image = form.include_image,
        workspace = %form.workspace().display(),
        "Request received: style recommendation"
    );

    let outcome = state
        .recommendations()
        .style_recommendation(&form.preferences, form.include_image)
        .await?;

    Ok(Json(StyleResponse {
        success: true,
        outcome,
    }))
}

/// Renders a PNG preview for a recommendation
pub async fn style_image(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<StyleRecommendation>, JsonRejection>,
) -> AppResult<Response> {
    let Json(recommendation) = payload?;
    tracing::info!(
        request_id = %request_id,
        style = %recommendation.style.title,
        items = recommendation.items.len(),
        "Request received: style image"
    );

    let bytes = state
        .recommendations()
        .generate_image(&recommendation)
        .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

/// Direct product search for one query
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Json(request) = payload?;
    tracing::info!(request_id = %request_id, query = %request.query, "Request received: search");

    let results = state
        .recommendations()
        .search_products(&request.query)
        .await?;

    Ok(Json(SearchResponse { results }))
}

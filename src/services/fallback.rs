//! Deterministic stand-ins for model output
//!
//! Every stage that depends on a completion call has a fallback here. Fallbacks are
//! pure functions of the user's inputs and never fail.
use std::fmt;

use crate::{
    error::AppError,
    models::{
        ClothingCategory, ItemRecommendation, SearchCategory, SearchQuerySet, StyleDescriptor,
        StyleRecommendation, UserAttributes, UserPreferences,
    },
    services::parser::ParseFailure,
};

pub const FALLBACK_STYLE_TITLE: &str = "Casual";
pub const FALLBACK_STYLE_DESCRIPTION: &str = "Casual style";
pub const FALLBACK_TAGS: [&str; 3] = ["casual", "comfortable", "everyday"];

/// Why a stage fell back to its deterministic output
#[derive(Debug)]
pub enum FallbackReason {
    Upstream(AppError),
    Malformed(ParseFailure),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Upstream(e) => write!(f, "upstream failure: {}", e),
            FallbackReason::Malformed(e) => write!(f, "malformed response: {}", e),
        }
    }
}

impl From<ParseFailure> for FallbackReason {
    fn from(failure: ParseFailure) -> Self {
        FallbackReason::Malformed(failure)
    }
}

impl From<AppError> for FallbackReason {
    fn from(error: AppError) -> Self {
        FallbackReason::Upstream(error)
    }
}

/// Returns the parsed value, or logs the reason and builds the fallback
pub fn resolve<T>(
    task: &'static str,
    outcome: Result<T, FallbackReason>,
    fallback: impl FnOnce() -> T,
) -> T {
    match outcome {
        Ok(value) => value,
        Err(reason) => {
            tracing::warn!(task, fallback = true, reason = %reason, "Using fallback output");
            fallback()
        }
    }
}

/// Every supplied text field, whitespace-normalised and space-joined
fn joined_text(prefs: &UserPreferences) -> String {
    prefs
        .text_fields()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fixed style with two items referencing the raw inputs
pub fn style_recommendation(prefs: &UserPreferences) -> StyleRecommendation {
    let info = joined_text(prefs);
    let first = if info.is_empty() {
        "Versatile everyday fashion item".to_string()
    } else {
        format!("Fashion item matching {}", info)
    };

    StyleRecommendation {
        style: StyleDescriptor {
            title: FALLBACK_STYLE_TITLE.to_string(),
            description: FALLBACK_STYLE_DESCRIPTION.to_string(),
            tags: FALLBACK_TAGS.iter().map(|t| t.to_string()).collect(),
            image: None,
        },
        items: vec![
            ItemRecommendation {
                description: first,
                category: ClothingCategory::Tops,
            },
            ItemRecommendation {
                description: format!("Fashion item for {} budget", prefs.budget),
                category: ClothingCategory::Bottoms,
            },
        ],
    }
}

/// One generic query built from the text inputs
pub fn search_queries(prefs: &UserPreferences) -> SearchQuerySet {
    let info = joined_text(prefs);
    let query = if info.is_empty() {
        "fashion".to_string()
    } else {
        format!("fashion {}", info)
    };
    SearchQuerySet::single(SearchCategory::Tops, query)
}

pub fn user_attributes() -> UserAttributes {
    UserAttributes::default()
}

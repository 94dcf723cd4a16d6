//! The recommendation pipeline
//!
//! Prompt construction, message assembly, the completion call, parsing and fallback are
//! the same for every task; only the task profile and the expected output type differ.
//! A task never fails: any upstream or parse failure yields the task's fallback.
use serde_json::Value;
use std::path::PathBuf;

use crate::{
    error::AppResult,
    models::{SearchQuerySet, StyleRecommendation, UserAttributes, UserPreferences},
    services::{
        completion::{CompletionInvoker, CompletionSettings},
        fallback::{self, FallbackReason},
        messages::assemble,
        parser::{parse_structured, ParseFailure, ParseOutcome, ResponseShape},
        prompt,
    },
};

/// Which uploaded photos a task attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageScope {
    ProfileOnly,
    All,
}

/// Static configuration for one pipeline task
#[derive(Debug)]
pub struct TaskProfile {
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub settings: CompletionSettings,
    pub images: ImageScope,
}

pub static ATTRIBUTE_ANALYSIS: TaskProfile = TaskProfile {
    name: "attribute_analysis",
    system_prompt: "You are a fashion expert and personal stylist. Analyze photos respectfully and describe only attributes relevant to clothing choices.",
    settings: CompletionSettings {
        temperature: 0.5,
        max_tokens: 800,
    },
    images: ImageScope::ProfileOnly,
};

pub static STYLE_RECOMMENDATION: TaskProfile = TaskProfile {
    name: "style_recommendation",
    system_prompt: "You are a fashion expert who provides specific and detailed clothing recommendations.",
    settings: CompletionSettings {
        temperature: 0.7,
        max_tokens: 800,
    },
    images: ImageScope::All,
};

pub static SEARCH_QUERIES: TaskProfile = TaskProfile {
    name: "search_queries",
    system_prompt: "You are a fashion search assistant. Generate precise, concise search queries that will find purchasable fashion items matching the user's preferences.",
    settings: CompletionSettings {
        temperature: 0.7,
        max_tokens: 400,
    },
    images: ImageScope::All,
};

/// An output type the pipeline can produce
pub trait StructuredResponse: ResponseShape + Send {
    fn profile() -> &'static TaskProfile;

    fn build_prompt(prefs: &UserPreferences, attrs: Option<&UserAttributes>) -> String;

    fn fallback(prefs: &UserPreferences) -> Self;
}

impl ResponseShape for StyleRecommendation {
    fn from_json(value: Value) -> ParseOutcome<Self> {
        let rec: StyleRecommendation = serde_json::from_value(value)
            .map_err(|e| ParseFailure::Incomplete(e.to_string()))?;
        if rec.items.is_empty() {
            return Err(ParseFailure::Incomplete("no items recommended".to_string()));
        }
        Ok(rec)
    }
}

impl StructuredResponse for StyleRecommendation {
    fn profile() -> &'static TaskProfile {
        &STYLE_RECOMMENDATION
    }

    fn build_prompt(prefs: &UserPreferences, attrs: Option<&UserAttributes>) -> String {
        prompt::style_recommendation_prompt(prefs, attrs)
    }

    fn fallback(prefs: &UserPreferences) -> Self {
        fallback::style_recommendation(prefs)
    }
}

impl ResponseShape for SearchQuerySet {
    fn from_json(value: Value) -> ParseOutcome<Self> {
        let set = value
            .as_object()
            .map(SearchQuerySet::from_loose_map)
            .unwrap_or_default();
        if set.is_empty() {
            return Err(ParseFailure::Incomplete(
                "no usable category queries".to_string(),
            ));
        }
        Ok(set)
    }
}

impl StructuredResponse for SearchQuerySet {
    fn profile() -> &'static TaskProfile {
        &SEARCH_QUERIES
    }

    fn build_prompt(prefs: &UserPreferences, attrs: Option<&UserAttributes>) -> String {
        prompt::search_query_prompt(prefs, attrs)
    }

    fn fallback(prefs: &UserPreferences) -> Self {
        fallback::search_queries(prefs)
    }
}

impl ResponseShape for UserAttributes {
    fn from_json(value: Value) -> ParseOutcome<Self> {
        serde_json::from_value(value).map_err(|e| ParseFailure::Incomplete(e.to_string()))
    }
}

impl StructuredResponse for UserAttributes {
    fn profile() -> &'static TaskProfile {
        &ATTRIBUTE_ANALYSIS
    }

    fn build_prompt(prefs: &UserPreferences, _attrs: Option<&UserAttributes>) -> String {
        prompt::attribute_analysis_prompt(prefs)
    }

    fn fallback(_prefs: &UserPreferences) -> Self {
        fallback::user_attributes()
    }
}

/// Photo bytes loaded once per request
#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    pub profile: Vec<Vec<u8>>,
    pub aesthetic: Vec<Vec<u8>>,
}

impl PhotoSet {
    pub async fn load(prefs: &UserPreferences) -> AppResult<Self> {
        Ok(Self {
            profile: read_all(&prefs.profile_photos).await?,
            aesthetic: read_all(&prefs.aesthetic_photos).await?,
        })
    }

    fn scoped(&self, scope: ImageScope) -> (&[Vec<u8>], &[Vec<u8>]) {
        match scope {
            ImageScope::ProfileOnly => (self.profile.as_slice(), &[]),
            ImageScope::All => (self.profile.as_slice(), self.aesthetic.as_slice()),
        }
    }
}

async fn read_all(paths: &[PathBuf]) -> AppResult<Vec<Vec<u8>>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(tokio::fs::read(path).await?);
    }
    Ok(images)
}

#[derive(Clone)]
pub struct RecommendationPipeline {
    invoker: CompletionInvoker,
}

impl RecommendationPipeline {
    pub fn new(invoker: CompletionInvoker) -> Self {
        Self { invoker }
    }

    /// Runs one task end to end, returning the fallback on any failure
    pub async fn run<T: StructuredResponse>(
        &self,
        prefs: &UserPreferences,
        attrs: Option<&UserAttributes>,
        photos: &PhotoSet,
    ) -> T {
        let profile = T::profile();
        let prompt = T::build_prompt(prefs, attrs);
        let (profile_images, aesthetic_images) = photos.scoped(profile.images);
        let request = assemble(profile.system_prompt, &prompt, profile_images, aesthetic_images);

        let outcome = match self
            .invoker
            .invoke(profile.name, profile.settings, request)
            .await
        {
            Ok(text) => parse_structured::<T>(&text).map_err(FallbackReason::from),
            Err(e) => Err(FallbackReason::from(e)),
        };

        fallback::resolve(profile.name, outcome, || T::fallback(prefs))
    }
}

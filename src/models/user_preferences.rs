use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Budget;

/// Style preferences submitted with a single request
///
/// Text fields are normalised on construction: blank values become `None`, so
/// downstream prompt building can treat `None` as "not provided".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub style_description: Option<String>,
    pub skin_tone: Option<String>,
    pub gender: Option<String>,
    pub expression: Option<String>,
    #[serde(default)]
    pub budget: Budget,
    /// Temporary files holding photos of the user
    #[serde(default)]
    pub profile_photos: Vec<PathBuf>,
    /// Temporary files holding inspiration photos
    #[serde(default)]
    pub aesthetic_photos: Vec<PathBuf>,
}

impl UserPreferences {
    pub fn new(
        style_description: Option<String>,
        skin_tone: Option<String>,
        gender: Option<String>,
        expression: Option<String>,
        budget: Budget,
    ) -> Self {
        Self {
            style_description: normalize(style_description),
            skin_tone: normalize(skin_tone),
            gender: normalize(gender),
            expression: normalize(expression),
            budget,
            profile_photos: Vec::new(),
            aesthetic_photos: Vec::new(),
        }
    }

    pub fn with_photos(mut self, profile: Vec<PathBuf>, aesthetic: Vec<PathBuf>) -> Self {
        self.profile_photos = profile;
        self.aesthetic_photos = aesthetic;
        self
    }

    /// True when at least one descriptive text field was supplied
    pub fn has_text_preferences(&self) -> bool {
        self.text_fields().next().is_some()
    }

    /// Supplied text fields in a fixed order: style, gender, skin tone, expression
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.style_description,
            &self.gender,
            &self.skin_tone,
            &self.expression,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Attributes derived from the user's own photos
///
/// Every field is optional; an absent field means it could not be derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_presentation: Option<String>,
    #[serde(
        default,
        alias = "apparent_age_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_impression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_suggestions: Vec<String>,
    #[serde(
        default,
        alias = "colors_to_complement",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub complementary_colors: Vec<String>,
    #[serde(default, alias = "avoid_styles", skip_serializing_if = "Vec::is_empty")]
    pub styles_to_avoid: Vec<String>,
}

impl UserAttributes {
    pub fn is_empty(&self) -> bool {
        self == &UserAttributes::default()
    }
}

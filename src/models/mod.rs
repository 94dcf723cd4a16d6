use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod product;
pub mod recommendation;
pub mod user_preferences;

pub use product::{
    CategorizedResults, ProductRecord, RichSnippet, SearchApiResponse, SearchApiResult,
};
pub use recommendation::{ItemRecommendation, SearchQuerySet, StyleDescriptor, StyleRecommendation};
pub use user_preferences::{UserAttributes, UserPreferences};

/// Budget tier chosen by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

impl Budget {
    /// Parses a free-form form value; anything unrecognised is treated as medium
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" | "budget" | "cheap" => Budget::Low,
            "high" | "luxury" | "premium" => Budget::High,
            _ => Budget::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Budget::Low => "low",
            Budget::Medium => "medium",
            Budget::High => "high",
        }
    }
}

impl Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a recommended clothing item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ClothingCategory {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Accessories,
}

impl ClothingCategory {
    pub const ALL: [ClothingCategory; 5] = [
        ClothingCategory::Tops,
        ClothingCategory::Bottoms,
        ClothingCategory::Dresses,
        ClothingCategory::Outerwear,
        ClothingCategory::Accessories,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClothingCategory::Tops => "Tops",
            ClothingCategory::Bottoms => "Bottoms",
            ClothingCategory::Dresses => "Dresses",
            ClothingCategory::Outerwear => "Outerwear",
            ClothingCategory::Accessories => "Accessories",
        }
    }
}

impl TryFrom<String> for ClothingCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim();
        ClothingCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| format!("unknown clothing category '{}'", value))
    }
}

impl Display for ClothingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category label used to key generated search queries and grouped results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 6] = [
        SearchCategory::Tops,
        SearchCategory::Bottoms,
        SearchCategory::Dresses,
        SearchCategory::Outerwear,
        SearchCategory::Shoes,
        SearchCategory::Accessories,
    ];

    /// Accepts the label in any case, singular or plural
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "tops" | "top" => Some(SearchCategory::Tops),
            "bottoms" | "bottom" => Some(SearchCategory::Bottoms),
            "dresses" | "dress" => Some(SearchCategory::Dresses),
            "outerwear" => Some(SearchCategory::Outerwear),
            "shoes" | "shoe" | "footwear" => Some(SearchCategory::Shoes),
            "accessories" | "accessory" => Some(SearchCategory::Accessories),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchCategory::Tops => "tops",
            SearchCategory::Bottoms => "bottoms",
            SearchCategory::Dresses => "dresses",
            SearchCategory::Outerwear => "outerwear",
            SearchCategory::Shoes => "shoes",
            SearchCategory::Accessories => "accessories",
        }
    }
}

impl Display for SearchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

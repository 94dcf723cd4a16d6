use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ClothingCategory, SearchCategory};

/// Overall style suggested for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Optional preview image as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A single recommended clothing item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecommendation {
    pub description: String,
    pub category: ClothingCategory,
}

/// Structured recommendation: a style plus the items that make it up
///
/// The model is asked for 4-6 items; the count is not enforced when parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRecommendation {
    pub style: StyleDescriptor,
    pub items: Vec<ItemRecommendation>,
}

/// One generated search query per clothing category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuerySet(BTreeMap<SearchCategory, String>);

impl SearchQuerySet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A set holding exactly one query
    pub fn single(category: SearchCategory, query: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.insert(category, query);
        set
    }

    /// Inserts a query, ignoring blank ones
    pub fn insert(&mut self, category: SearchCategory, query: impl Into<String>) {
        let query = query.into();
        let query = query.trim();
        if !query.is_empty() {
            self.0.insert(category, query.to_string());
        }
    }

    pub fn get(&self, category: SearchCategory) -> Option<&str> {
        self.0.get(&category).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SearchCategory, &str)> {
        self.0.iter().map(|(c, q)| (*c, q.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds a set from loosely-keyed model output
    ///
    /// Keys outside the category set and non-string values are dropped.
    pub fn from_loose_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut set = Self::new();
        for (key, value) in map {
            let (Some(category), Some(query)) = (SearchCategory::from_label(key), value.as_str())
            else {
                continue;
            };
            set.insert(category, query);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_style_recommendation_deserializes() {
        let value = json!({
            "style": {
                "title": "Smart Casual",
                "description": "Relaxed tailoring",
                "tags": ["tailored", "relaxed"]
            },
            "items": [
                { "description": "Linen blazer", "category": "Outerwear" },
                { "description": "White tee", "category": "tops" }
            ]
        });

        let rec: StyleRecommendation = serde_json::from_value(value).unwrap();
        assert_eq!(rec.style.title, "Smart Casual");
        assert_eq!(rec.items.len(), 2);
        assert_eq!(rec.items[1].category, ClothingCategory::Tops);
        assert_eq!(rec.style.image, None);
    }

    #[test]
    fn test_style_recommendation_requires_tags() {
        let value = json!({
            "style": { "title": "Boho", "description": "Loose layers" },
            "items": []
        });

        let result: Result<StyleRecommendation, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_set_ignores_blank_queries() {
        let mut set = SearchQuerySet::new();
        set.insert(SearchCategory::Tops, "  ");
        set.insert(SearchCategory::Shoes, " white leather sneakers ");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(SearchCategory::Shoes), Some("white leather sneakers"));
    }

    #[test]
    fn test_query_set_from_loose_map() {
        let value = json!({
            "Tops": "cream cable knit sweater",
            "shoe": "chelsea boots",
            "hats": "bucket hat",
            "bottoms": 42
        });

        let set = SearchQuerySet::from_loose_map(value.as_object().unwrap());
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(SearchCategory::Tops), Some("cream cable knit sweater"));
        assert_eq!(set.get(SearchCategory::Shoes), Some("chelsea boots"));
    }

    #[test]
    fn test_query_set_serializes_as_category_map() {
        let mut set = SearchQuerySet::new();
        set.insert(SearchCategory::Outerwear, "camel wool coat");
        set.insert(SearchCategory::Bottoms, "wide leg trousers");

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            json!({ "bottoms": "wide leg trousers", "outerwear": "camel wool coat" })
        );
    }
}

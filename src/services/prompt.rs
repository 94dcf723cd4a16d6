//! Prompt construction
//!
//! Each prompt is a task statement, the attributes that were actually supplied (absent
//! ones produce no text at all) and an output-format contract naming the exact keys
//! and category values expected back. Output depends only on the inputs.
use crate::models::{ClothingCategory, SearchCategory, UserAttributes, UserPreferences};

const INFER_FROM_PHOTOS: &str = "No explicit style preferences were provided. Infer suitable attributes (style, colors, fit) from any attached photos; if no photos are attached, suggest a versatile everyday look.";

struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    fn new(task: &str) -> Self {
        let mut text = String::with_capacity(1024);
        text.push_str(task.trim());
        text.push_str("\n\n");
        Self { text }
    }

    fn line(&mut self, line: &str) -> &mut Self {
        self.text.push_str(line);
        self.text.push('\n');
        self
    }

    fn attribute(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.text.push_str(label);
            self.text.push_str(": ");
            self.text.push_str(value);
            self.text.push('\n');
        }
        self
    }

    fn count(&mut self, label: &str, count: usize) -> &mut Self {
        if count > 0 {
            self.line(&format!("{}: {}", label, count));
        }
        self
    }

    fn list(&mut self, label: &str, values: &[String]) -> &mut Self {
        if !values.is_empty() {
            self.line(&format!("{}: {}", label, values.join(", ")));
        }
        self
    }

    fn preferences(&mut self, prefs: &UserPreferences) -> &mut Self {
        self.line("User preferences:")
            .attribute("Style preferences", prefs.style_description.as_deref())
            .attribute("Gender", prefs.gender.as_deref())
            .attribute("Skin tone", prefs.skin_tone.as_deref())
            .attribute("Expression/Mood", prefs.expression.as_deref())
            .attribute("Budget level", Some(prefs.budget.as_str()))
            .count("Number of profile photos provided", prefs.profile_photos.len())
            .count(
                "Number of inspiration photos provided",
                prefs.aesthetic_photos.len(),
            );

        if !prefs.has_text_preferences() {
            self.line(INFER_FROM_PHOTOS);
        }
        self
    }

    fn user_attributes(&mut self, attrs: Option<&UserAttributes>) -> &mut Self {
        let Some(attrs) = attrs.filter(|a| !a.is_empty()) else {
            return self;
        };

        self.text.push('\n');
        self.line("User attributes (from photo analysis):")
            .attribute("Gender presentation", attrs.gender_presentation.as_deref())
            .attribute("Age range", attrs.age_range.as_deref())
            .attribute("Body type", attrs.body_type.as_deref())
            .attribute("Height impression", attrs.height_impression.as_deref())
            .attribute("Skin tone category", attrs.skin_tone.as_deref())
            .list("Style suggestions", &attrs.style_suggestions)
            .list("Complementary colors", &attrs.complementary_colors)
            .list("Styles to avoid", &attrs.styles_to_avoid)
    }

    fn contract(&mut self, contract: &str) -> String {
        self.text.push('\n');
        self.text.push_str(contract.trim());
        self.text.push('\n');
        std::mem::take(&mut self.text)
    }
}

fn clothing_category_names() -> String {
    ClothingCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn search_category_names() -> String {
    SearchCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt asking for a style plus 4-6 items
pub fn style_recommendation_prompt(
    prefs: &UserPreferences,
    attrs: Option<&UserAttributes>,
) -> String {
    let categories = clothing_category_names();
    let contract = format!(
        r#"Please return your response in the following JSON format EXACTLY:
{{
    "style": {{
        "title": "Style category name",
        "description": "Description of the style",
        "tags": ["tag1", "tag2"]
    }},
    "items": [
        {{
            "description": "Detailed description of the recommended item",
            "category": "Category (must be one of: {categories})"
        }}
    ]
}}

Make sure to:
1. Include 4-6 items
2. Use the exact category names: {categories}
3. Make descriptions specific and detailed
4. Consider the provided budget level and style preferences
5. Return ONLY the JSON, no additional text"#
    );

    PromptBuilder::new(
        "As a fashion expert, analyze the provided information and generate fashion recommendations.",
    )
    .preferences(prefs)
    .user_attributes(attrs)
    .contract(&contract)
}

/// Prompt asking for one shopping query per category
pub fn search_query_prompt(prefs: &UserPreferences, attrs: Option<&UserAttributes>) -> String {
    let categories = search_category_names();
    let contract = format!(
        r#"Please return your response as a JSON object mapping each category to ONE concise shopping search query:
{{
    "tops": "search query",
    "bottoms": "search query",
    "outerwear": "search query",
    "shoes": "search query",
    "accessories": "search query"
}}

Make sure to:
1. Use only these keys: {categories}
2. Include "dresses" only when dresses suit the user's preferences
3. Keep each query under 10 words and specific enough to find purchasable products
4. Reflect the budget level in the wording of each query
5. Return ONLY the JSON, no additional text"#
    );

    PromptBuilder::new(
        "Create precise search queries for finding fashion items that match the user's preferences.",
    )
    .preferences(prefs)
    .user_attributes(attrs)
    .contract(&contract)
}

/// Prompt asking for physical attributes visible in the user's photos
pub fn attribute_analysis_prompt(prefs: &UserPreferences) -> String {
    let contract = r#"Provide your analysis in JSON format with the following fields:
{
    "gender_presentation": "masculine, feminine, androgynous, ...",
    "age_range": "e.g. 18-25, 25-35, 35-50",
    "body_type": "e.g. rectangle, hourglass, athletic, pear, apple",
    "height_impression": "tall, average or petite",
    "skin_tone": "very fair, fair, medium, olive, tan, deep, ...",
    "style_suggestions": ["3-5 specific style suggestions"],
    "complementary_colors": ["3-5 colors that complement their features"],
    "styles_to_avoid": ["1-2 less flattering styles or cuts"]
}

Omit any field you cannot determine. Return ONLY the JSON, no additional text."#;

    let mut builder = PromptBuilder::new(
        "Analyze the attached photos of a person and extract physical attributes relevant for clothing recommendations. Be respectful and inclusive.",
    );
    builder.count(
        "Number of profile photos provided",
        prefs.profile_photos.len(),
    );
    builder.contract(contract)
}

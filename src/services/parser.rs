//! Extraction of a single JSON object from free-form model output
//!
//! Models often wrap JSON in prose or code fences. The strategy is to slice from the
//! first `{` to the last `}` inclusive, decode that, then let the expected type check
//! its own shape. Every failure comes back as a [`ParseFailure`].
use serde_json::Value;

/// Why model output could not be turned into the expected structure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseFailure {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("incomplete response: {0}")]
    Incomplete(String),
}

/// Result of parsing model output; failures are values, never panics
pub type ParseOutcome<T> = Result<T, ParseFailure>;

/// A type that can be validated out of a decoded JSON object
pub trait ResponseShape: Sized {
    fn from_json(value: Value) -> ParseOutcome<Self>;
}

/// Slices the outermost `{...}` out of `text` and decodes it
pub fn extract_json_object(text: &str) -> ParseOutcome<Value> {
    let start = text.find('{').ok_or(ParseFailure::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ParseFailure::NoJsonObject)?;
    if end < start {
        return Err(ParseFailure::NoJsonObject);
    }

    serde_json::from_str(&text[start..=end]).map_err(|e| ParseFailure::InvalidJson(e.to_string()))
}

/// Extracts and validates a structured response in one step
pub fn parse_structured<T: ResponseShape>(text: &str) -> ParseOutcome<T> {
    extract_json_object(text).and_then(T::from_json)
}

pub mod completion;
pub mod fallback;
pub mod imagery;
pub mod messages;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod search;

pub use completion::{CompletionInvoker, CompletionSettings, ModelSelection};
pub use imagery::ImageDerivationService;
pub use pipeline::{PhotoSet, RecommendationPipeline};
pub use recommendations::{ProductRecommendations, RecommendationService, StyleOutcome};
pub use search::{ProductSearchAdapter, ThumbnailInference};

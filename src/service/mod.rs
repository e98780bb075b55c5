pub mod categorizer;
pub mod keywords;
pub mod pipeline;
pub mod sentiment;
pub mod translator;

pub use categorizer::ClaimCategorizer;
pub use pipeline::ClaimPipeline;
pub use sentiment::SentimentClient;
pub use translator::Translator;

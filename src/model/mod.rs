pub mod claim;
pub mod config;
pub mod ollama;

pub use claim::{Claim, ClaimCategory, ClaimStatus, RankedClaim, Sentiment, NOT_TRANSLATED};
pub use config::Config;

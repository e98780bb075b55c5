//! Claim enrichment pipeline
//!
//! Linear staging: validate, optionally translate, analyze sentiment,
//! categorize, persist. Stage failures in translation, sentiment and AI
//! categorization are converted to sentinel values at the stage boundary;
//! only validation and persistence failures terminate the request.

use crate::db::repository::ClaimRepository;
use crate::db::DbError;
use crate::model::{ClaimStatus, RankedClaim};
use crate::service::categorizer::ClaimCategorizer;
use crate::service::sentiment::SentimentClient;
use crate::service::translator::Translator;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Only non-empty claims are allowed")]
    EmptyClaim,

    #[error("Failed to save the claim due to a database error: {0}")]
    Database(#[from] DbError),
}

/// Orchestrates claim enrichment and persistence
pub struct ClaimPipeline {
    translator: Translator,
    sentiment: SentimentClient,
    categorizer: ClaimCategorizer,
    repository: ClaimRepository,
    claim_language: String,
    base_language: String,
}

impl ClaimPipeline {
    pub fn new(
        translator: Translator,
        sentiment: SentimentClient,
        categorizer: ClaimCategorizer,
        repository: ClaimRepository,
        claim_language: String,
        base_language: String,
    ) -> Self {
        Self {
            translator,
            sentiment,
            categorizer,
            repository,
            claim_language,
            base_language,
        }
    }

    /// Run a claim through the full enrichment pipeline
    pub async fn process(&self, claim: &str) -> Result<RankedClaim, PipelineError> {
        if claim.is_empty() {
            tracing::warn!("Attempted to process an empty claim");
            return Err(PipelineError::EmptyClaim);
        }

        tracing::info!(claim = %truncate(claim, 70), "Received new claim for ranking");

        // The original text is always what gets stored; translation only
        // redirects the downstream analysis stages.
        let mut working = claim.to_string();
        let mut translation: Option<String> = None;

        if contains_cyrillic(claim) {
            match self
                .translator
                .translate(claim, &self.claim_language, &self.base_language)
                .await
            {
                Some(translated) => {
                    if translated != claim {
                        tracing::info!(translated = %truncate(&translated, 70), "Translated claim for analysis");
                        working = translated.clone();
                    } else {
                        tracing::info!("Translator returned original claim");
                    }
                    translation = Some(translated);
                }
                None => {
                    tracing::warn!(
                        source = %self.claim_language,
                        target = %self.base_language,
                        "Translation failed; proceeding with original claim"
                    );
                }
            }
        }

        let (sentiment, warning) = self.sentiment.analyze(&working).await;
        let category = self.categorizer.categorize(&working).await;

        let id = self
            .repository
            .insert(claim, translation.as_deref(), sentiment, category)
            .await?;

        Ok(RankedClaim {
            id,
            status: ClaimStatus::Open,
            sentiment,
            category,
            warning,
        })
    }
}

/// Detect input plausibly in a non-base script
///
/// Checks for Cyrillic-range characters; stands in for "needs translation"
/// and can be swapped for another heuristic without touching the pipeline.
fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

//! Database models for claims

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::model::{Claim, ClaimCategory, ClaimStatus, Sentiment};

/// Database representation of a claim
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub id: i64,
    pub text: String,
    pub translation: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment: String,
    pub category: String,
}

impl ClaimRow {
    /// Convert database row to domain model
    ///
    /// Stored strings outside the closed sets map to the degraded enum
    /// values; the domain invariant is that sentiment and category are
    /// always one of the closed variants.
    pub fn into_domain(self) -> Claim {
        let status = match self.status.as_str() {
            "closed" => ClaimStatus::Closed,
            _ => ClaimStatus::Open,
        };

        let sentiment = Sentiment::from_label(&self.sentiment).unwrap_or(Sentiment::Unknown);

        let category = match self.category.as_str() {
            "SERVICE" => ClaimCategory::Service,
            "PAYMENT" => ClaimCategory::Payment,
            "ACCOUNT" => ClaimCategory::Account,
            "AI_UNAVAILABLE" => ClaimCategory::AiUnavailable,
            _ => ClaimCategory::Other,
        };

        Claim {
            id: self.id,
            text: self.text,
            translation: self.translation,
            status,
            timestamp: self.timestamp,
            sentiment,
            category,
        }
    }
}

//! Domain model for claims, sentiment and categorization results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Marker stored in the translation column when no translation was produced
pub const NOT_TRANSLATED: &str = "Not translated";

/// Sentiment of a claim as reported by the sentiment service
///
/// `Unknown` doubles as the degraded value when the service fails or returns
/// a label outside the closed set; the advisory warning on the response
/// carries that distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Sentiment {
    Negative,
    Positive,
    Neutral,
    Unknown,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "Negative",
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Unknown => "Unknown",
        }
    }

    /// Parse an external sentiment label, case-insensitively
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "negative" => Some(Sentiment::Negative),
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "unknown" => Some(Sentiment::Unknown),
            _ => None,
        }
    }

    /// Ranking priority: Negative < Neutral < Positive. `Unknown` carries no
    /// position and must be excluded from ordering.
    #[allow(dead_code)] // Reserved for ranking endpoints
    pub fn priority(&self) -> Option<u8> {
        match self {
            Sentiment::Negative => Some(0),
            Sentiment::Neutral => Some(1),
            Sentiment::Positive => Some(2),
            Sentiment::Unknown => None,
        }
    }
}

/// Closed set of claim categories
///
/// `Other` is the valid fallback when neither the keyword nor the AI stage
/// positively matches; `AiUnavailable` signals that the AI fallback stage
/// could not be reached or errored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimCategory {
    Service,
    Payment,
    Account,
    Other,
    AiUnavailable,
}

impl ClaimCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimCategory::Service => "SERVICE",
            ClaimCategory::Payment => "PAYMENT",
            ClaimCategory::Account => "ACCOUNT",
            ClaimCategory::Other => "OTHER",
            ClaimCategory::AiUnavailable => "AI_UNAVAILABLE",
        }
    }
}

/// Claim lifecycle status: created open, closed exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Open,
    Closed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Open => "open",
            ClaimStatus::Closed => "closed",
        }
    }
}

/// A persisted claim record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Claim {
    pub id: i64,
    pub text: String,
    /// Translated text, the original text (same-language no-op), or the
    /// literal "Not translated" marker. Never empty.
    pub translation: String,
    pub status: ClaimStatus,
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub category: ClaimCategory,
}

/// Response body for a freshly ranked claim
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankedClaim {
    pub id: i64,
    pub status: ClaimStatus,
    pub sentiment: Sentiment,
    pub category: ClaimCategory,
    /// Advisory message describing any degraded enrichment stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

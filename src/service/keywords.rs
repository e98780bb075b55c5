//! Stage 1 keyword classifier
//!
//! Pure, synchronous token-set matching against an ordered keyword map.
//! No match is a fallthrough signal to the AI stage, not an error.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::model::ClaimCategory;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// One ordered entry of the keyword map, as configured in YAML
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub category: ClaimCategory,
    pub keywords: HashSet<String>,
}

/// Ordered mapping of category to keyword set
///
/// Iteration order is significant: a token set can satisfy several rules and
/// the first match wins, so the rule list fixes the canonical precedence.
#[derive(Debug, Clone)]
pub struct KeywordMap {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordMap {
    fn default() -> Self {
        let rule = |category, words: &[&str]| KeywordRule {
            category,
            keywords: words.iter().map(|w| w.to_string()).collect(),
        };

        Self {
            rules: vec![
                rule(
                    ClaimCategory::Payment,
                    &[
                        "payment",
                        "bill",
                        "billing",
                        "charge",
                        "charged",
                        "overcharged",
                        "fee",
                        "refund",
                        "invoice",
                        "money",
                        "pay",
                        "subscription",
                    ],
                ),
                rule(
                    ClaimCategory::Service,
                    &[
                        "service", "support", "help", "agent", "staff", "rude", "slow", "wait",
                        "waiting", "response", "answer", "call",
                    ],
                ),
                rule(
                    ClaimCategory::Account,
                    &[
                        "account", "login", "signin", "password", "access", "locked", "blocked",
                        "profile", "email", "username",
                    ],
                ),
            ],
        }
    }
}

impl KeywordMap {
    pub fn from_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Classify a claim by keyword intersection, first matching rule wins.
    /// Returns `None` when no rule matches.
    pub fn classify(&self, text: &str) -> Option<ClaimCategory> {
        let tokens = preprocess(text);
        self.rules
            .iter()
            .find(|rule| !rule.keywords.is_disjoint(&tokens))
            .map(|rule| rule.category)
    }
}

/// Lowercase, strip non-word characters and split into a token set.
/// Duplicates collapse so classification is order- and frequency-independent.
fn preprocess(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    cleaned.split_whitespace().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_payment_keyword() {
        let map = KeywordMap::default();
        assert_eq!(
            map.classify("I was double-charged for my subscription"),
            Some(ClaimCategory::Payment)
        );
    }

    #[test]
    fn matching_ignores_case_punctuation_and_repetition() {
        let map = KeywordMap::default();
        assert_eq!(
            map.classify("REFUND!!! Refund, refund..."),
            Some(ClaimCategory::Payment)
        );
    }

    #[test]
    fn no_keyword_match_falls_through() {
        let map = KeywordMap::default();
        assert_eq!(map.classify("the weather is lovely today"), None);
    }

    #[test]
    fn first_matching_rule_wins() {
        // "payment" and "account" both present; PAYMENT is ordered first.
        let map = KeywordMap::default();
        assert_eq!(
            map.classify("payment issue with my account"),
            Some(ClaimCategory::Payment)
        );

        // Reversed rule order flips the result.
        let reversed = KeywordMap::from_rules(vec![
            KeywordRule {
                category: ClaimCategory::Account,
                keywords: ["account".to_string()].into_iter().collect(),
            },
            KeywordRule {
                category: ClaimCategory::Payment,
                keywords: ["payment".to_string()].into_iter().collect(),
            },
        ]);
        assert_eq!(
            reversed.classify("payment issue with my account"),
            Some(ClaimCategory::Account)
        );
    }

    #[test]
    fn hyphenated_words_collapse_before_matching() {
        // "double-charged" becomes "doublecharged", which is not a keyword;
        // the standalone "charged" token still is.
        let map = KeywordMap::default();
        assert_eq!(map.classify("double-charged"), None);
        assert_eq!(map.classify("charged twice"), Some(ClaimCategory::Payment));
    }
}

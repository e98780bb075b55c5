//! Sentiment analysis client
//!
//! Calls the external sentiment endpoint with the raw claim bytes. Every
//! failure degrades to `Sentiment::Unknown` plus an advisory warning so the
//! pipeline never stalls on sentiment.

use reqwest::Client;
use serde::Deserialize;

use crate::model::Sentiment;

const FAILURE_WARNING: &str = "Sentiment analysis failed; value defaulted to 'Unknown'.";

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    sentiment: String,
}

/// Client for the external sentiment analysis service
#[derive(Clone)]
pub struct SentimentClient {
    client: Client,
    url: String,
    api_key: String,
}

impl SentimentClient {
    pub fn new(client: Client, url: String, api_key: String) -> Self {
        Self {
            client,
            url,
            api_key,
        }
    }

    /// Analyze the sentiment of a claim
    ///
    /// Infallible by contract: transport errors, non-2xx statuses, malformed
    /// bodies and unrecognized labels all map to `Unknown` with a warning.
    pub async fn analyze(&self, claim: &str) -> (Sentiment, Option<String>) {
        let result = self
            .client
            .post(&self.url)
            .header("apikey", &self.api_key)
            .body(claim.as_bytes().to_vec())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Sentiment request failed, defaulting to 'Unknown'");
                return (Sentiment::Unknown, Some(FAILURE_WARNING.to_string()));
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                status = response.status().as_u16(),
                "Sentiment service returned error status, defaulting to 'Unknown'"
            );
            return (Sentiment::Unknown, Some(FAILURE_WARNING.to_string()));
        }

        let body: SentimentResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed sentiment response, defaulting to 'Unknown'");
                return (Sentiment::Unknown, Some(FAILURE_WARNING.to_string()));
            }
        };

        match Sentiment::from_label(&body.sentiment) {
            Some(sentiment) => {
                tracing::info!(sentiment = sentiment.as_str(), "Sentiment analysis result");
                (sentiment, None)
            }
            None => {
                tracing::warn!(value = %body.sentiment, "Unrecognized sentiment value");
                (
                    Sentiment::Unknown,
                    Some(format!(
                        "Unrecognized sentiment value '{}'; defaulted to 'Unknown'.",
                        body.sentiment
                    )),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SentimentClient {
        SentimentClient::new(
            Client::new(),
            format!("{}/sentiment", server.uri()),
            "test-key".to_string(),
        )
    }

    #[tokio::test]
    async fn well_formed_response_maps_case_insensitively() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sentiment"))
            .and(header("apikey", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"sentiment": "positive"})),
            )
            .mount(&server)
            .await;

        let (sentiment, warning) = client_for(&server).analyze("great service").await;
        assert_eq!(sentiment, Sentiment::Positive);
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn error_status_defaults_to_unknown_with_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (sentiment, warning) = client_for(&server).analyze("anything").await;
        assert_eq!(sentiment, Sentiment::Unknown);
        assert_eq!(warning.as_deref(), Some(FAILURE_WARNING));
    }

    #[tokio::test]
    async fn malformed_body_defaults_to_unknown_with_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let (sentiment, warning) = client_for(&server).analyze("anything").await;
        assert_eq!(sentiment, Sentiment::Unknown);
        assert!(warning.is_some());
    }

    #[tokio::test]
    async fn unmapped_label_defaults_to_unknown_with_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"sentiment": "elated"})),
            )
            .mount(&server)
            .await;

        let (sentiment, warning) = client_for(&server).analyze("anything").await;
        assert_eq!(sentiment, Sentiment::Unknown);
        assert!(warning.unwrap().contains("elated"));
    }

    #[tokio::test]
    async fn unreachable_service_defaults_to_unknown_with_warning() {
        let client = SentimentClient::new(
            Client::new(),
            "http://127.0.0.1:1/sentiment".to_string(),
            "test-key".to_string(),
        );

        let (sentiment, warning) = client.analyze("anything").await;
        assert_eq!(sentiment, Sentiment::Unknown);
        assert_eq!(warning.as_deref(), Some(FAILURE_WARNING));
    }
}

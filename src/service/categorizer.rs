//! Two-stage claim categorizer
//!
//! Stage 1 is the synchronous keyword classifier; on a miss, stage 2 asks a
//! local Ollama model to pick one of the allowed categories. Stage 2 never
//! fails the request: transport problems map to `AiUnavailable`, malformed
//! or unrecognized answers map to `Other`.

use reqwest::Client;

use crate::model::ollama::{ChatMessage, ChatOptions, ChatRequest, ChatResponse};
use crate::model::ClaimCategory;
use crate::service::keywords::KeywordMap;

/// Multi-stage categorizer backed by a local Ollama service
#[derive(Clone)]
pub struct ClaimCategorizer {
    client: Client,
    keyword_map: KeywordMap,
    ai_categories: Vec<ClaimCategory>,
    model: String,
    endpoint: String,
}

impl ClaimCategorizer {
    pub fn new(
        client: Client,
        keyword_map: KeywordMap,
        ai_categories: Vec<ClaimCategory>,
        model: String,
        ollama_host: &str,
    ) -> Self {
        let endpoint = format!("{}/api/chat", ollama_host.trim_end_matches('/'));
        tracing::info!(endpoint = %endpoint, model = %model, "Categorizer initialized");

        Self {
            client,
            keyword_map,
            ai_categories,
            model,
            endpoint,
        }
    }

    /// Categorize a claim: keyword stage first, AI stage only on a miss
    pub async fn categorize(&self, claim: &str) -> ClaimCategory {
        if let Some(category) = self.keyword_map.classify(claim) {
            tracing::info!(category = category.as_str(), "Stage 1 keyword match");
            return category;
        }

        tracing::info!(model = %self.model, "Stage 1 found no match, asking AI stage");
        let category = self.categorize_with_ai(claim).await;
        tracing::info!(category = category.as_str(), "Final category");
        category
    }

    async fn categorize_with_ai(&self, claim: &str) -> ClaimCategory {
        let allowed: Vec<&str> = self.ai_categories.iter().map(|c| c.as_str()).collect();
        let system_prompt = format!(
            "You are an expert text classification system. \
             Classify the user's message into ONE of the following categories. \
             Respond with ONLY the category name and nothing else. \
             Categories: {}",
            allowed.join(", ")
        );

        let payload = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(claim)],
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };

        let response = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, endpoint = %self.endpoint, "Connection to Ollama failed");
                return ClaimCategory::AiUnavailable;
            }
        };

        if !response.status().is_success() {
            tracing::error!(
                status = response.status().as_u16(),
                "Ollama returned an error status"
            );
            return ClaimCategory::AiUnavailable;
        }

        let parsed: ChatResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Ollama response failed to parse");
                return ClaimCategory::Other;
            }
        };

        let Some(message) = parsed.message else {
            tracing::warn!("Ollama response was valid but contained no 'message' object");
            return ClaimCategory::Other;
        };

        let answer = message.content.trim();
        match self
            .ai_categories
            .iter()
            .find(|category| category.as_str() == answer)
        {
            Some(category) => *category,
            None => {
                tracing::warn!(value = %answer, "Ollama returned an unrecognized category");
                ClaimCategory::Other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn categorizer_for(host: &str) -> ClaimCategorizer {
        ClaimCategorizer::new(
            Client::new(),
            KeywordMap::default(),
            vec![
                ClaimCategory::Payment,
                ClaimCategory::Service,
                ClaimCategory::Other,
            ],
            "mistral".to_string(),
            host,
        )
    }

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "mistral",
            "message": {"role": "assistant", "content": content}
        })
    }

    #[tokio::test]
    async fn keyword_match_skips_ai_stage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("OTHER")))
            .expect(0)
            .mount(&server)
            .await;

        let category = categorizer_for(&server.uri())
            .categorize("I demand a refund")
            .await;
        assert_eq!(category, ClaimCategory::Payment);
        server.verify().await;
    }

    #[tokio::test]
    async fn keyword_miss_invokes_ai_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("SERVICE")))
            .expect(1)
            .mount(&server)
            .await;

        let category = categorizer_for(&server.uri())
            .categorize("something entirely unclassifiable")
            .await;
        assert_eq!(category, ClaimCategory::Service);
        server.verify().await;
    }

    #[tokio::test]
    async fn connection_failure_yields_ai_unavailable() {
        let category = categorizer_for("http://127.0.0.1:1")
            .categorize("something entirely unclassifiable")
            .await;
        assert_eq!(category, ClaimCategory::AiUnavailable);
    }

    #[tokio::test]
    async fn error_status_yields_ai_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let category = categorizer_for(&server.uri())
            .categorize("something entirely unclassifiable")
            .await;
        assert_eq!(category, ClaimCategory::AiUnavailable);
    }

    #[tokio::test]
    async fn missing_message_object_yields_other() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"model": "mistral"})),
            )
            .mount(&server)
            .await;

        let category = categorizer_for(&server.uri())
            .categorize("something entirely unclassifiable")
            .await;
        assert_eq!(category, ClaimCategory::Other);
    }

    #[tokio::test]
    async fn unrecognized_answer_yields_other() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("GARDENING")))
            .mount(&server)
            .await;

        let category = categorizer_for(&server.uri())
            .categorize("something entirely unclassifiable")
            .await;
        assert_eq!(category, ClaimCategory::Other);
    }

    #[tokio::test]
    async fn whitespace_around_answer_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("  PAYMENT\n")))
            .mount(&server)
            .await;

        let category = categorizer_for(&server.uri())
            .categorize("something entirely unclassifiable")
            .await;
        assert_eq!(category, ClaimCategory::Payment);
    }
}

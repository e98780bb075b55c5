//! Wire models for the Ollama chat completion endpoint

use serde::{Deserialize, Serialize};

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request payload for `/api/chat`
///
/// Streaming is disabled and temperature pinned to zero so the classifier
/// answer is a single deterministic message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
}

/// Response payload from `/api/chat`
///
/// `message` is optional: a response that parses but carries no message
/// object is tolerated at the type level and handled by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[allow(dead_code)] // Part of the wire contract, not used after parsing
    pub model: String,
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

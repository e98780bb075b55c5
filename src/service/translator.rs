//! Claim translation for non-base-language input
//!
//! Models are resolved eagerly at startup, one per configured language pair
//! key ("source-target"). A pair whose model fails its readiness check is
//! recorded as unavailable instead of failing startup, so one bad pair never
//! prevents the others from loading. All invocation failures collapse to
//! `None`; the caller falls back to the original text.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Errors from a translation model invocation
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model returned status {0}")]
    Status(u16),
}

/// One element of the backend's output list
#[derive(Debug, Deserialize)]
pub struct TranslationOutput {
    pub translation_text: Option<String>,
}

/// Seam over the translation backend, one instance per loaded language pair
#[async_trait]
pub trait TranslationModel: Send + Sync {
    async fn invoke(&self, text: &str) -> Result<Vec<TranslationOutput>, TranslationError>;
}

/// Translation model served by a local inference endpoint
///
/// Speaks the HuggingFace pipeline shape: POST `{"inputs": text}`, response
/// `[{"translation_text": "..."}]`.
struct HostedTranslationModel {
    client: Client,
    url: String,
}

#[async_trait]
impl TranslationModel for HostedTranslationModel {
    async fn invoke(&self, text: &str) -> Result<Vec<TranslationOutput>, TranslationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslationError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Translator over the configured language pairs
///
/// The model map is immutable after construction and safe to share across
/// concurrent pipeline executions.
pub struct Translator {
    models: HashMap<String, Option<Arc<dyn TranslationModel>>>,
}

impl Translator {
    /// Eagerly resolve a model for every configured language pair
    ///
    /// Each model gets a readiness probe against the inference endpoint; a
    /// probe failure marks the pair unavailable and loading continues.
    pub async fn load(
        client: &Client,
        endpoint: &str,
        model_mapping: &HashMap<String, String>,
    ) -> Self {
        let mut models: HashMap<String, Option<Arc<dyn TranslationModel>>> = HashMap::new();

        for (lang_pair, model_name) in model_mapping {
            let url = format!(
                "{}/models/{}",
                endpoint.trim_end_matches('/'),
                model_name
            );

            let ready = match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => true,
                Ok(response) => {
                    tracing::warn!(
                        lang_pair = %lang_pair,
                        model = %model_name,
                        status = response.status().as_u16(),
                        "Translation model not ready; pair will be unavailable"
                    );
                    false
                }
                Err(e) => {
                    tracing::warn!(
                        lang_pair = %lang_pair,
                        model = %model_name,
                        error = %e,
                        "Failed to load translation model; pair will be unavailable"
                    );
                    false
                }
            };

            if ready {
                tracing::info!(lang_pair = %lang_pair, model = %model_name, "Translation model loaded");
                models.insert(
                    lang_pair.clone(),
                    Some(Arc::new(HostedTranslationModel {
                        client: client.clone(),
                        url,
                    })),
                );
            } else {
                models.insert(lang_pair.clone(), None);
            }
        }

        Self { models }
    }

    /// Translate text between the given languages
    ///
    /// Returns the input unchanged for empty text or a same-language pair,
    /// and `None` whenever no usable translation can be produced.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Option<String> {
        if text.is_empty() {
            tracing::warn!("Empty text received for translation");
            return Some(text.to_string());
        }

        if source_lang == target_lang {
            tracing::debug!(lang = %source_lang, "Source and target languages match, no translation needed");
            return Some(text.to_string());
        }

        let key = format!("{}-{}", source_lang, target_lang);
        let model = match self.models.get(&key) {
            Some(Some(model)) => model,
            _ => {
                tracing::debug!(lang_pair = %key, "No loaded model for language pair");
                return None;
            }
        };

        match model.invoke(text).await {
            // An empty translation_text is as unusable as a missing one; the
            // translation column must never hold the empty string.
            Ok(outputs) => match outputs
                .into_iter()
                .next()
                .and_then(|o| o.translation_text)
                .filter(|t| !t.is_empty())
            {
                Some(translated) => {
                    tracing::debug!(translated = %translated, "Translated text");
                    Some(translated)
                }
                None => {
                    tracing::warn!(lang_pair = %key, "Malformed translation output, missing or empty translation_text");
                    None
                }
            },
            Err(e) => {
                tracing::error!(lang_pair = %key, error = %e, "Translation invocation failed");
                None
            }
        }
    }
}

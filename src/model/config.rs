use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::model::ClaimCategory;
use crate::service::keywords::{KeywordMap, KeywordRule};

const ENV_CONFIG_PATH: &str = "CLAIMS_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_DATABASE_FILE: &str = "CLAIMS_DATABASE_FILE";
const ENV_SENTIMENT_URL: &str = "CLAIMS_SENTIMENT_URL";
const ENV_SENTIMENT_API_KEY: &str = "CLAIMS_SENTIMENT_API_KEY";
const ENV_BASE_LANGUAGE: &str = "CLAIMS_BASE_LANGUAGE";
const ENV_CLAIM_LANGUAGE: &str = "CLAIMS_CLAIM_LANGUAGE";
const ENV_HTTP_TIMEOUT_SECS: &str = "CLAIMS_HTTP_TIMEOUT_SECS";
const ENV_TRANSLATION_URL: &str = "CLAIMS_TRANSLATION_URL";
const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";

const DEFAULT_DATABASE_FILE: &str = "claims.db";
const DEFAULT_SENTIMENT_URL: &str = "https://api.apilayer.com/sentiment/analysis";
const DEFAULT_BASE_LANGUAGE: &str = "en";
const DEFAULT_CLAIM_LANGUAGE: &str = "ru";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TRANSLATION_URL: &str = "http://127.0.0.1:8090";
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "mistral";

/// YAML configuration file structure
///
/// Carries the tunable classification parameters; everything absent falls
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Ordered keyword rules for the stage 1 classifier
    #[serde(default)]
    pub keywords: Option<Vec<KeywordRule>>,
    /// Categories the AI stage is allowed to answer with
    #[serde(default)]
    pub ai_categories: Option<Vec<ClaimCategory>>,
    /// Translation model per "source-target" language pair key
    #[serde(default)]
    pub translation_models: Option<HashMap<String, String>>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_file: String,
    pub sentiment_url: String,
    pub sentiment_api_key: String,
    pub base_language: String,
    pub claim_language: String,
    pub http_timeout: Duration,
    pub translation_url: String,
    pub translation_models: HashMap<String, String>,
    pub ollama_host: String,
    pub ollama_model: String,
    pub keyword_map: KeywordMap,
    pub ai_categories: Vec<ClaimCategory>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            sentiment_url: DEFAULT_SENTIMENT_URL.to_string(),
            sentiment_api_key: String::new(),
            base_language: DEFAULT_BASE_LANGUAGE.to_string(),
            claim_language: DEFAULT_CLAIM_LANGUAGE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            translation_url: DEFAULT_TRANSLATION_URL.to_string(),
            translation_models: default_translation_models(),
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            keyword_map: KeywordMap::default(),
            ai_categories: default_ai_categories(),
        }
    }
}

fn default_translation_models() -> HashMap<String, String> {
    HashMap::from([(
        "ru-en".to_string(),
        "Helsinki-NLP/opus-mt-ru-en".to_string(),
    )])
}

fn default_ai_categories() -> Vec<ClaimCategory> {
    vec![
        ClaimCategory::Payment,
        ClaimCategory::Service,
        ClaimCategory::Other,
    ]
}

impl Config {
    /// Load configuration from environment and the optional config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let http_timeout = std::env::var(ENV_HTTP_TIMEOUT_SECS)
            .ok()
            .and_then(|t| t.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        let sentiment_api_key = std::env::var(ENV_SENTIMENT_API_KEY).unwrap_or_else(|_| {
            tracing::warn!(
                "{} not set; sentiment analysis will be degraded to 'Unknown'",
                ENV_SENTIMENT_API_KEY
            );
            String::new()
        });

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            host,
            port,
            database_file: env_or(ENV_DATABASE_FILE, DEFAULT_DATABASE_FILE),
            sentiment_url: env_or(ENV_SENTIMENT_URL, DEFAULT_SENTIMENT_URL),
            sentiment_api_key,
            base_language: env_or(ENV_BASE_LANGUAGE, DEFAULT_BASE_LANGUAGE),
            claim_language: env_or(ENV_CLAIM_LANGUAGE, DEFAULT_CLAIM_LANGUAGE),
            http_timeout,
            translation_url: env_or(ENV_TRANSLATION_URL, DEFAULT_TRANSLATION_URL),
            translation_models: file
                .translation_models
                .unwrap_or_else(default_translation_models),
            ollama_host: env_or(ENV_OLLAMA_HOST, DEFAULT_OLLAMA_HOST),
            ollama_model: env_or(ENV_OLLAMA_MODEL, DEFAULT_OLLAMA_MODEL),
            keyword_map: file
                .keywords
                .map(KeywordMap::from_rules)
                .unwrap_or_default(),
            ai_categories: file.ai_categories.unwrap_or_else(default_ai_categories),
        }
    }

    /// Load configuration from YAML file; any problem degrades to defaults
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

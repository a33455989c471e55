use crate::error::{FinanceAdvisorError, Result};
use std::env;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const BASE_URL_ENV: &str = "ADVICE_BASE_URL";
pub const MODEL_ENV: &str = "ADVICE_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 700;

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AdviceClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Reads the key from `GROQ_API_KEY`; base URL and model may be
    /// overridden through `ADVICE_BASE_URL` and `ADVICE_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| FinanceAdvisorError::MissingApiKey(API_KEY_ENV.to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Ok(model) = env::var(MODEL_ENV) {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

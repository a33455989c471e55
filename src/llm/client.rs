use crate::advice::{AdviceSummary, ADVICE_SYSTEM_PROMPT};
use crate::error::{FinanceAdvisorError, Result};
use crate::llm::config::AdviceClientConfig;
use crate::llm::types::*;
use log::{debug, info};
use reqwest::Client;

#[derive(Clone)]
pub struct AdviceClient {
    client: Client,
    config: AdviceClientConfig,
}

impl AdviceClient {
    pub fn new(config: AdviceClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(AdviceClientConfig::from_env()?))
    }

    pub fn config(&self) -> &AdviceClientConfig {
        &self.config
    }

    pub fn build_request(&self, summary: &AdviceSummary) -> Result<ChatCompletionRequest> {
        Ok(ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(ADVICE_SYSTEM_PROMPT),
                ChatMessage::user(summary.to_prompt()?),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        })
    }

    /// Sends the summary and returns the model's raw answer.
    pub async fn generate(&self, summary: &AdviceSummary) -> Result<String> {
        let payload = self.build_request(summary)?;
        info!("Requesting advice from model {}", self.config.model);

        let res = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(FinanceAdvisorError::AdviceGeneration(format!(
                "API error (status {}): {}",
                status, err_text
            )));
        }

        let body: ChatCompletionResponse = res.json().await?;
        let text = body.first_text().ok_or_else(|| {
            FinanceAdvisorError::AdviceGeneration("No text in response".to_string())
        })?;

        debug!("Received {} characters of advice", text.len());
        Ok(text.to_string())
    }
}

//! HTTP text-generation client

use crate::{MessageError, MessageGenerator};
use serde::{Deserialize, Serialize};

/// Configuration for the HTTP generator
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Text-generation endpoint URL
    pub endpoint: String,
    /// Bearer token sent with each request
    pub api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: Option<String>,
}

/// Client for an external text-generation service
///
/// Sends a neutral prompt naming only the group's display name and expects
/// `{"text": "..."}` back. Timeout enforcement and fallback substitution
/// live in [`crate::generate_or_fallback`], not here.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl HttpGenerator {
    /// Create new generator from config
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The prompt sent for `group_name`
    ///
    /// Deliberately blind: it names the group's display name and asks for a
    /// short neutral acknowledgement, nothing about what the group means.
    #[must_use]
    pub fn prompt_for(group_name: &str) -> String {
        format!(
            "You are a warm, professional research study assistant. A subject has \
             just been assigned to the study group named \"{group_name}\". Write a \
             short (2-3 sentence) thank-you message: acknowledge their \
             participation, confirm they have been sorted, and ask them to notify \
             the research assistant that they are done. Do not explain what the \
             group means. Tone: calm, reassuring, professional."
        )
    }
}

#[async_trait::async_trait]
impl MessageGenerator for HttpGenerator {
    async fn generate(&self, group_name: &str) -> Result<String, MessageError> {
        let prompt = Self::prompt_for(group_name);
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&GenerateRequest { prompt: &prompt })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MessageError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| MessageError::Malformed(e.to_string()))?;
        body.text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| MessageError::Malformed("empty text field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_group_but_stays_blind() {
        let prompt = HttpGenerator::prompt_for("Tier 1 Group");
        assert!(prompt.contains("Tier 1 Group"));
        assert!(prompt.contains("Do not explain what the group means"));
    }

    #[test]
    fn response_with_missing_text_decodes() {
        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(body.text.is_none());
    }
}

//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{render_prompt, AdviceGenerator, AdviceRequest};
use crate::config::AdvisorSettings;
use crate::error::{ExpenseError, ExpenseResult};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Advice generator backed by the Gemini API
#[derive(Clone)]
pub struct GeminiAdvisor {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAdvisor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Build a client from settings, reading the key from the configured variable
    pub fn from_settings(settings: &AdvisorSettings) -> ExpenseResult<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ExpenseError::Config(format!(
                    "Set {} to use the advisor",
                    settings.api_key_env
                ))
            })?;

        Ok(Self::new(api_key, settings.model.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The key travels in a header, never in the URL
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AdviceGenerator for GeminiAdvisor {
    async fn generate(&self, request: &AdviceRequest) -> ExpenseResult<String> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": render_prompt(request) }]
            }]
        });

        log::debug!("Requesting advice from model {}", self.model);
        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ExpenseError::Advisor(format!("Request failed: {}", e.without_url())))?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(ExpenseError::Advisor(format!(
                "Gemini API error (status {}): {}",
                status, err_text
            )));
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| {
                ExpenseError::Advisor(format!("Malformed response: {}", e.without_url()))
            })?;

        extract_text(&body)
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(body: &Value) -> ExpenseResult<String> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| ExpenseError::Advisor("No candidates returned".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ExpenseError::Advisor("Candidate has no text".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Spend " }, { "text": "less." }] }
            }]
        });
        assert_eq!(extract_text(&body).unwrap(), "Spend less.");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        assert!(extract_text(&json!({ "candidates": [] })).is_err());
        assert!(extract_text(&json!({ "promptFeedback": {} })).is_err());
    }

    #[test]
    fn test_endpoint_has_no_key() {
        let advisor = GeminiAdvisor::new("secret-key-123", "gemini-test");
        let endpoint = advisor.endpoint();
        assert!(endpoint.ends_with("/models/gemini-test:generateContent"));
        assert!(!endpoint.contains("secret-key-123"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        // Nothing listens on port 1
        let advisor = GeminiAdvisor::new("secret-key-123", "gemini-test")
            .with_base_url("http://127.0.0.1:1");
        let request = AdviceRequest {
            year: 2025,
            expense_data: "[]".to_string(),
            user_profile: None,
        };

        let err = advisor.generate(&request).await.unwrap_err();
        assert!(matches!(err, ExpenseError::Advisor(_)));
        assert!(!err.to_string().contains("secret-key-123"));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = AdvisorSettings {
            api_key_env: "EXPENSE_GRID_TEST_MISSING_KEY".to_string(),
            ..AdvisorSettings::default()
        };
        assert!(matches!(
            GeminiAdvisor::from_settings(&settings),
            Err(ExpenseError::Config(_))
        ));
    }
}

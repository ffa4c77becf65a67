use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Engine, EngineResponse};
use crate::errors::EngineError;

/// Chat-completions endpoint
const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Model used for both translations and connection probes
const OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Low temperature keeps translations close to the source
const TRANSLATION_TEMPERATURE: f32 = 0.3;

/// Timeout for translation requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tighter timeout for the connection probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on tokens generated by the probe, enough for any reply
const PROBE_MAX_TOKENS: u32 = 5;

/// Keys shorter than this are rejected without a network round trip
const MIN_KEY_LENGTH: usize = 10;

/// OpenAI client for chat-completion translation requests
#[derive(Debug)]
pub struct OpenAi {
    /// HTTP client for API requests
    client: Client,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Serialize)]
struct ChatMessage {
    /// Role of the message sender (system, user)
    role: String,

    /// Content of the message
    content: String,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Generated choices; the first one carries the translation
    choices: Vec<ChatChoice>,

    /// Token usage information, absent on some compatible servers
    usage: Option<ChatUsage>,
}

/// Individual choice in a chat completion response
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// The generated message
    message: ChatChoiceMessage,
}

/// Message payload of a choice
#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    /// The generated text
    content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
struct ChatUsage {
    /// Prompt plus completion tokens
    total_tokens: u64,
}

impl ChatRequest {
    /// Build a translation request: instruction as the system message,
    /// text as the user message
    fn translation(text: &str, instruction: &str) -> Self {
        Self {
            model: OPENAI_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: instruction.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: Some(TRANSLATION_TEMPERATURE),
            max_tokens: None,
        }
    }

    /// Build a minimal probe request that validates the key without
    /// incurring translation cost
    fn probe() -> Self {
        Self {
            model: OPENAI_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Test connection".to_string(),
            }],
            temperature: None,
            max_tokens: Some(PROBE_MAX_TOKENS),
        }
    }
}

/// Extract a human-readable message from an error response body.
/// Prefers the structured `error.message` field, then the first 100
/// characters of the raw body, then a generic status string.
fn extract_error_message(status_code: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }

    if !body.is_empty() {
        return body.chars().take(100).collect();
    }

    format!("Error {}", status_code)
}

impl OpenAi {
    /// Create a new OpenAI client
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for OpenAi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for OpenAi {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn translate(
        &self,
        text: &str,
        instruction: &str,
        api_key: &str,
    ) -> Result<EngineResponse, EngineError> {
        let request = ChatRequest::translation(text, instruction);

        let response = self
            .client
            .post(OPENAI_ENDPOINT)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                EngineError::RequestFailed(format!("Failed to send request to OpenAI API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(status.as_u16(), &body);
            error!("OpenAI API error ({}): {}", status, message);
            return Err(EngineError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let chat_response = response.json::<ChatResponse>().await.map_err(|e| {
            EngineError::ParseError(format!("Failed to parse OpenAI API response: {}", e))
        })?;

        let token_count = chat_response
            .usage
            .map(|usage| usage.total_tokens)
            .unwrap_or(0);
        let translated = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| {
                EngineError::ParseError("OpenAI response contained no choices".to_string())
            })?;

        Ok(EngineResponse {
            text: translated,
            token_count,
        })
    }

    async fn test_connection(&self, api_key: &str) -> (bool, String) {
        if api_key.trim().len() < MIN_KEY_LENGTH {
            return (false, "Invalid API key format for OpenAI".to_string());
        }

        let request = ChatRequest::probe();
        let response = self
            .client
            .post(OPENAI_ENDPOINT)
            .bearer_auth(api_key)
            .timeout(PROBE_TIMEOUT)
            .json(&request)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    (true, "Connection successful".to_string())
                } else {
                    let body = response.text().await.unwrap_or_default();
                    (false, extract_error_message(status.as_u16(), &body))
                }
            }
            Err(e) => (false, e.to_string()),
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::{Engine, EngineResponse};
use crate::errors::EngineError;

/// Artificial latency of a simulated translation call
const TRANSLATION_DELAY: Duration = Duration::from_millis(1000);

/// Artificial latency of a simulated connection test
const CONNECTION_TEST_DELAY: Duration = Duration::from_millis(800);

/// Minimum key length the simulation accepts
const MIN_KEY_LENGTH: usize = 10;

/// Simulated Gemini 2.0 client
///
/// Stands in for the real API while no credentials exist: fixed latency, a
/// token count derived from the input length with random jitter, and a
/// clearly tagged echo of the input instead of a genuine translation.
#[derive(Debug, Default)]
pub struct Gemini;

impl Gemini {
    /// Create a new simulated Gemini client
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for Gemini {
    fn name(&self) -> &'static str {
        "Gemini 2.0"
    }

    async fn translate(
        &self,
        text: &str,
        _instruction: &str,
        _api_key: &str,
    ) -> Result<EngineResponse, EngineError> {
        tokio::time::sleep(TRANSLATION_DELAY).await;

        let token_count = text.chars().count() as u64 / 2 + rand::rng().random_range(10..=40);

        Ok(EngineResponse {
            text: format!("[Gemini 2.0 translation] {}", text),
            token_count,
        })
    }

    async fn test_connection(&self, api_key: &str) -> (bool, String) {
        tokio::time::sleep(CONNECTION_TEST_DELAY).await;

        if api_key.len() < MIN_KEY_LENGTH {
            return (false, "Invalid API key format for Gemini".to_string());
        }

        (true, "Connection successful".to_string())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::{Engine, EngineResponse};
use crate::errors::EngineError;

/// Artificial latency of a simulated translation call
const TRANSLATION_DELAY: Duration = Duration::from_millis(1200);

/// Artificial latency of a simulated connection test
const CONNECTION_TEST_DELAY: Duration = Duration::from_millis(700);

/// Minimum key length the simulation accepts
const MIN_KEY_LENGTH: usize = 8;

/// Simulated DeepSeek V3 client
///
/// Same simulation model as the Gemini client with slightly different
/// latency and token arithmetic, so the two engines remain distinguishable
/// in usage reports.
#[derive(Debug, Default)]
pub struct DeepSeek;

impl DeepSeek {
    /// Create a new simulated DeepSeek client
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for DeepSeek {
    fn name(&self) -> &'static str {
        "DeepSeek V3"
    }

    async fn translate(
        &self,
        text: &str,
        _instruction: &str,
        _api_key: &str,
    ) -> Result<EngineResponse, EngineError> {
        tokio::time::sleep(TRANSLATION_DELAY).await;

        let token_count = text.chars().count() as u64 / 3 + rand::rng().random_range(5..=30);

        Ok(EngineResponse {
            text: format!("[DeepSeek V3 translation] {}", text),
            token_count,
        })
    }

    async fn test_connection(&self, api_key: &str) -> (bool, String) {
        tokio::time::sleep(CONNECTION_TEST_DELAY).await;

        if api_key.len() < MIN_KEY_LENGTH {
            return (false, "Invalid API key format for DeepSeek".to_string());
        }

        (true, "Connection successful".to_string())
    }
}

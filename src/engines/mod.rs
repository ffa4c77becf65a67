/*!
 * Translation engine adapters.
 *
 * This module contains one client per engine the router can dispatch to:
 * - OpenAI: live chat-completions API integration
 * - Gemini: simulated client with artificial latency
 * - DeepSeek: simulated client with artificial latency
 * - Mock: configurable test double
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::EngineError;

/// Successful result of a single translation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    /// The translated text
    pub text: String,
    /// Tokens consumed by the call, as reported (or simulated) upstream
    pub token_count: u64,
}

/// Common trait for all translation engines
///
/// This trait defines the interface that all engine implementations must
/// follow, allowing the router to treat live and simulated backends
/// interchangeably.
#[async_trait]
pub trait Engine: Send + Sync + Debug {
    /// Engine display name, also used as the usage-ledger key
    fn name(&self) -> &'static str;

    /// Translate text according to an instruction
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `instruction` - The effective instruction built by the router
    /// * `api_key` - Key for the upstream service
    ///
    /// # Returns
    /// * `Result<EngineResponse, EngineError>` - Translated text and token
    ///   count, or an error when the upstream call fails
    async fn translate(
        &self,
        text: &str,
        instruction: &str,
        api_key: &str,
    ) -> Result<EngineResponse, EngineError>;

    /// Check whether the engine is reachable with the given key
    ///
    /// Infallible by contract: failures are reported through the returned
    /// message. Keys shorter than the engine's minimum length are rejected
    /// without any network traffic.
    async fn test_connection(&self, api_key: &str) -> (bool, String);
}

pub mod openai;
pub mod gemini;
pub mod deepseek;
pub mod mock;

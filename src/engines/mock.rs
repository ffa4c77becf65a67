/*!
 * Mock engine implementations for testing.
 *
 * This module provides mock engines that simulate different behaviors:
 * - `MockEngine::working()` - Always succeeds with a tagged echo
 * - `MockEngine::empty()` - Succeeds with an empty translation
 * - `MockEngine::intermittent(n)` - Fails every nth request
 * - `MockEngine::failing()` - Always fails with an API error
 * - `MockEngine::slow(ms)` - Succeeds after a fixed delay
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engines::{Engine, EngineResponse};
use crate::errors::EngineError;

/// Deterministic token surcharge added to the input length
const MOCK_TOKEN_OVERHEAD: u64 = 10;

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a tagged echo
    Working,
    /// Succeeds with an empty translation
    Empty,
    /// Fails intermittently (every nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for cancellation testing)
    Slow { delay_ms: u64 },
}

/// Mock engine for testing monitor and router behavior
#[derive(Debug)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures and call assertions
    request_count: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock engine that succeeds with an empty translation
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create an intermittently failing mock engine
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock engine that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock engine that succeeds after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of translate calls made so far, across clones
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockEngine {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl Engine for MockEngine {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn translate(
        &self,
        text: &str,
        _instruction: &str,
        _api_key: &str,
    ) -> Result<EngineResponse, EngineError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let token_count = text.chars().count() as u64 + MOCK_TOKEN_OVERHEAD;

        match self.behavior {
            MockBehavior::Working => Ok(EngineResponse {
                text: format!("[Mock translation] {}", text),
                token_count,
            }),

            MockBehavior::Empty => Ok(EngineResponse {
                text: String::new(),
                token_count,
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(EngineError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(EngineResponse {
                        text: format!("[Mock translation] {}", text),
                        token_count,
                    })
                }
            }

            MockBehavior::Failing => Err(EngineError::ApiError {
                message: "Simulated engine failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(EngineResponse {
                    text: format!("[Mock translation] {}", text),
                    token_count,
                })
            }
        }
    }

    async fn test_connection(&self, _api_key: &str) -> (bool, String) {
        match self.behavior {
            MockBehavior::Failing => (false, "Simulated engine failure".to_string()),
            _ => (true, "Connection successful".to_string()),
        }
    }
}

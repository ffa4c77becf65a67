/*!
 * Translation routing.
 *
 * The router owns one adapter per known engine, synthesizes the effective
 * instruction for a request, and dispatches to the adapter matching the
 * request's engine identifier. Unrecognized identifiers fall back to the
 * default engine rather than failing, so a stale or hand-edited settings
 * file degrades to a working configuration.
 */

use std::sync::Arc;

use log::debug;

use crate::engines::deepseek::DeepSeek;
use crate::engines::gemini::Gemini;
use crate::engines::openai::OpenAi;
use crate::engines::{Engine, EngineResponse};
use crate::errors::EngineError;

/// One translation to perform, constructed fresh per poll cycle and never
/// mutated after dispatch
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// The text to translate
    pub text: String,
    /// Source language, as written into the instruction
    pub source_lang: String,
    /// Target language, as written into the instruction
    pub target_lang: String,
    /// Desired tone of the translation
    pub tone: String,
    /// Optional caller-supplied context prepended to the instruction
    pub context: String,
    /// Engine identifier (id or display name)
    pub engine: String,
    /// Key for the upstream service
    pub api_key: String,
}

/// Build the effective instruction for a request.
///
/// With no context this is exactly the translation directive; otherwise the
/// directive is appended to the supplied context.
pub fn build_instruction(source_lang: &str, target_lang: &str, tone: &str, context: &str) -> String {
    let directive = format!(
        "Translate from {} to {} in a {} tone.",
        source_lang, target_lang, tone
    );
    if context.is_empty() {
        directive
    } else {
        format!("{} {}", context, directive)
    }
}

/// Dispatches translation requests to engine adapters
#[derive(Debug, Clone)]
pub struct TranslationRouter {
    openai: Arc<dyn Engine>,
    gemini: Arc<dyn Engine>,
    deepseek: Arc<dyn Engine>,
}

impl TranslationRouter {
    /// Create a router over the real engine adapters
    pub fn new() -> Self {
        Self {
            openai: Arc::new(OpenAi::new()),
            gemini: Arc::new(Gemini::new()),
            deepseek: Arc::new(DeepSeek::new()),
        }
    }

    /// Create a router that dispatches every identifier to one engine.
    /// Used by tests to substitute a mock for all backends.
    pub fn with_single_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            openai: Arc::clone(&engine),
            gemini: Arc::clone(&engine),
            deepseek: engine,
        }
    }

    /// Resolve an engine identifier to its adapter.
    ///
    /// Accepts configuration ids (`openai`) and display names
    /// (`Gemini 2.0`) case-insensitively; anything else routes to OpenAI.
    pub fn resolve(&self, engine: &str) -> &Arc<dyn Engine> {
        match engine.trim().to_lowercase().as_str() {
            "openai" => &self.openai,
            "gemini" | "gemini 2.0" => &self.gemini,
            "deepseek" | "deepseek v3" => &self.deepseek,
            _ => &self.openai,
        }
    }

    /// Translate a request through the adapter its engine field selects.
    /// Adapter errors propagate to the caller untouched.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<EngineResponse, EngineError> {
        let instruction = build_instruction(
            &request.source_lang,
            &request.target_lang,
            &request.tone,
            &request.context,
        );
        let engine = self.resolve(&request.engine);
        debug!(
            "Dispatching {} chars to {}",
            request.text.chars().count(),
            engine.name()
        );
        engine.translate(&request.text, &instruction, &request.api_key).await
    }

    /// Run the connection test of the adapter an identifier selects
    pub async fn test_connection(&self, engine: &str, api_key: &str) -> (bool, String) {
        self.resolve(engine).test_connection(api_key).await
    }
}

impl Default for TranslationRouter {
    fn default() -> Self {
        Self::new()
    }
}

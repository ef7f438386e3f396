//! LLM integration.
//!
//! The pipeline talks to an `LlmProvider`; `OpenAiProvider` is the only
//! concrete backend and speaks the OpenAI Chat Completions protocol, so any
//! compatible endpoint works via `TRIAGE_API_BASE`.

mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::config::TriageConfig;
use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl From<&TriageConfig> for LlmConfig {
    fn from(config: &TriageConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            timeout: config.request_timeout,
        }
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = OpenAiProvider::new(
        config.api_key.clone(),
        config.api_base.clone(),
        config.model.clone(),
        config.timeout,
    )?;
    tracing::info!("Using OpenAI-compatible endpoint (model: {})", config.model);
    Ok(Arc::new(provider))
}

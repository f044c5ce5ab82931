//! Provider registry and factory.
//!
//! Maps provider names to concrete [`CompletionProvider`] implementations.

use crate::agent::config::AgentConfig;
use crate::agent::provider::CompletionProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates a [`CompletionProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default) — `OpenAI`-compatible APIs via `async-openai`,
///   including DashScope through the base URL override
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown provider names.
pub fn create_provider(config: &AgentConfig) -> Result<Box<dyn CompletionProvider>, AgentError> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(config))),
        other => Err(AgentError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}

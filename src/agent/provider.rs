//! Pluggable completion provider trait.
//!
//! Implementations translate a prompt string into a provider-specific
//! completion call. This keeps the orchestrator decoupled from any
//! particular LLM vendor; the loop only ever sees text in, text out.

use async_trait::async_trait;

use crate::error::AgentError;

/// Trait for reasoning-engine backends.
///
/// Implementations handle the transport layer (HTTP, SDK calls) for a
/// specific provider while presenting a uniform text-completion interface.
/// No streaming: the orchestrator consumes whole responses.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes one completion round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures or response decode errors.
    async fn complete(&self, prompt: &str) -> Result<String, AgentError>;
}

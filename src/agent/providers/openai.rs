//! `OpenAI` provider implementation using the `async-openai` crate.
//!
//! Supports any `OpenAI`-compatible API (`OpenAI`, DashScope, local
//! proxies) via the base URL override in [`AgentConfig`].

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, Stop,
};
use async_trait::async_trait;

use crate::agent::config::AgentConfig;
use crate::agent::provider::CompletionProvider;
use crate::error::AgentError;

/// Stop sequence cutting the model off before it fabricates observations.
/// The ReAct template reserves `Observation:` lines for real tool output.
const OBSERVATION_STOP: &str = "\nObservation:";

/// `OpenAI`-compatible completion provider.
///
/// Wraps the `async-openai` client for chat completions. Compatible with
/// any API that follows the `OpenAI` chat completion spec.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Creates a new provider from agent configuration.
    #[must_use]
    pub fn new(config: &AgentConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_completion_tokens,
        }
    }

    /// Builds a single-user-message completion request for the prompt.
    fn build_request(&self, prompt: &str) -> CreateChatCompletionRequest {
        let message = ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
            name: None,
        });

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![message],
            temperature: Some(self.temperature).filter(|&t| t != 0.0),
            max_completion_tokens: Some(self.max_tokens),
            stop: Some(Stop::String(OBSERVATION_STOP.to_string())),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<async-openai::Client>")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let request = self.build_request(prompt);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ApiRequest {
                message: e.to_string(),
                status: None,
            })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .unwrap_or_default();

        Ok(content)
    }
}

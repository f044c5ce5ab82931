//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment
//! variables → defaults. The config is constructed once at startup and
//! passed by reference into the provider and source constructors; nothing
//! reads or mutates process-wide state after that.

use std::time::Duration;

use crate::error::AgentError;

/// Default maximum reasoning/acting cycles per run.
const DEFAULT_MAX_ITERATIONS: usize = 5;
/// Default global cap on aggregated publications.
const DEFAULT_MAX_RESULTS: usize = 5;
/// Default per-keyword cap on pulled records.
const DEFAULT_PER_KEYWORD_RESULTS: usize = 5;
/// Default pause after each pulled record, in milliseconds.
const DEFAULT_SEARCH_DELAY_MS: u64 = 1000;
/// Default timeout for a single source pull, in seconds.
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
/// Default timeout for a single completion call, in seconds.
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 120;
/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Default maximum completion tokens.
const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 1000;

/// Configuration for the agent system.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Completion provider name (e.g., "openai").
    pub provider: String,
    /// API key for the completion provider.
    pub api_key: String,
    /// Optional base URL override (DashScope, proxies, compatible APIs).
    pub base_url: Option<String>,
    /// Model identifier for the reasoning engine.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per completion.
    pub max_completion_tokens: u32,
    /// Maximum reasoning/acting cycles, including failed-parse retries.
    /// The primary safeguard against unbounded loops.
    pub max_iterations: usize,
    /// Timeout for each completion call.
    pub completion_timeout: Duration,
    /// Global cap on aggregated publications per search.
    pub max_results: usize,
    /// Per-keyword cap on pulled records.
    pub per_keyword_results: usize,
    /// Pause after each pulled record, to respect source rate limits.
    pub search_delay: Duration,
    /// Timeout for each source pull.
    pub search_timeout: Duration,
    /// Optional API key for the publication source.
    pub search_api_key: Option<String>,
    /// Optional egress proxy URL, applied best-effort to the source client.
    pub proxy: Option<String>,
    /// Deduplicate identical publications surfaced by more than one
    /// keyword. Off by default: duplication across keywords is documented
    /// behavior of the aggregation.
    pub dedupe: bool,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_completion_tokens: Option<u32>,
    max_iterations: Option<usize>,
    completion_timeout: Option<Duration>,
    max_results: Option<usize>,
    per_keyword_results: Option<usize>,
    search_delay: Option<Duration>,
    search_timeout: Option<Duration>,
    search_api_key: Option<String>,
    proxy: Option<String>,
    dedupe: Option<bool>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("SCHOLAR_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("SCHOLAR_API_KEY")
                .or_else(|_| std::env::var("DASHSCOPE_API_KEY"))
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("SCHOLAR_BASE_URL")
                .or_else(|_| std::env::var("OPENAI_BASE_URL"))
                .ok();
        }
        if self.model.is_none() {
            self.model = std::env::var("SCHOLAR_MODEL").ok();
        }
        if self.search_api_key.is_none() {
            self.search_api_key = std::env::var("SCHOLAR_SEARCH_API_KEY")
                .or_else(|_| std::env::var("S2_API_KEY"))
                .ok();
        }
        if self.proxy.is_none() {
            self.proxy = std::env::var("SCHOLAR_PROXY")
                .or_else(|_| std::env::var("HTTPS_PROXY"))
                .ok();
        }
        if self.max_iterations.is_none() {
            self.max_iterations = std::env::var("SCHOLAR_MAX_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the completion provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the maximum completion tokens.
    #[must_use]
    pub const fn max_completion_tokens(mut self, n: u32) -> Self {
        self.max_completion_tokens = Some(n);
        self
    }

    /// Sets the maximum reasoning/acting cycles.
    #[must_use]
    pub const fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the completion call timeout.
    #[must_use]
    pub const fn completion_timeout(mut self, duration: Duration) -> Self {
        self.completion_timeout = Some(duration);
        self
    }

    /// Sets the global publication cap.
    #[must_use]
    pub const fn max_results(mut self, n: usize) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Sets the per-keyword record cap.
    #[must_use]
    pub const fn per_keyword_results(mut self, n: usize) -> Self {
        self.per_keyword_results = Some(n);
        self
    }

    /// Sets the pause after each pulled record.
    #[must_use]
    pub const fn search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    /// Sets the per-pull timeout.
    #[must_use]
    pub const fn search_timeout(mut self, duration: Duration) -> Self {
        self.search_timeout = Some(duration);
        self
    }

    /// Sets the publication source API key.
    #[must_use]
    pub fn search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = Some(key.into());
        self
    }

    /// Sets the egress proxy URL.
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Enables or disables cross-keyword deduplication.
    #[must_use]
    pub const fn dedupe(mut self, on: bool) -> Self {
        self.dedupe = Some(on);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            model: self.model.unwrap_or_else(|| "qwen-turbo".to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_completion_tokens: self
                .max_completion_tokens
                .unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            completion_timeout: self
                .completion_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS)),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            per_keyword_results: self
                .per_keyword_results
                .unwrap_or(DEFAULT_PER_KEYWORD_RESULTS),
            search_delay: self
                .search_delay
                .unwrap_or(Duration::from_millis(DEFAULT_SEARCH_DELAY_MS)),
            search_timeout: self
                .search_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS)),
            search_api_key: self.search_api_key,
            proxy: self.proxy,
            dedupe: self.dedupe.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "qwen-turbo");
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(config.per_keyword_results, DEFAULT_PER_KEYWORD_RESULTS);
        assert_eq!(config.search_delay, Duration::from_secs(1));
        assert!(!config.dedupe);
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = AgentConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AgentConfig::builder()
            .api_key("key")
            .model("qwen-plus")
            .max_iterations(8)
            .max_results(3)
            .search_delay(Duration::ZERO)
            .completion_timeout(Duration::from_secs(30))
            .dedupe(true)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.model, "qwen-plus");
        assert_eq!(config.max_iterations, 8);
        assert_eq!(config.max_results, 3);
        assert_eq!(config.search_delay, Duration::ZERO);
        assert_eq!(config.completion_timeout, Duration::from_secs(30));
        assert!(config.dedupe);
    }
}

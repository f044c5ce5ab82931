//! Error types for scholar-rs.
//!
//! Two taxonomies: [`AgentError`] for the reasoning/acting loop and its
//! provider, [`SearchError`] for the publication source. Keyword-level
//! search failures are recoverable and absorbed by the aggregator; agent
//! errors propagate out of the run and are handled per query by the CLI.

use thiserror::Error;

/// Errors from the agent loop, provider, or tool dispatch.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was configured for the completion provider.
    #[error(
        "no API key configured (set SCHOLAR_API_KEY, DASHSCOPE_API_KEY, or OPENAI_API_KEY)"
    )]
    ApiKeyMissing,

    /// The configured provider name is not recognized.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider name.
        name: String,
    },

    /// The completion API call failed.
    #[error("completion request failed: {message}")]
    ApiRequest {
        /// Error detail from the provider SDK.
        message: String,
        /// HTTP status code, if one was received.
        status: Option<u16>,
    },

    /// The completion call exceeded the configured timeout.
    #[error("completion call timed out after {seconds}s")]
    CompletionTimeout {
        /// The timeout that elapsed, in seconds.
        seconds: u64,
    },

    /// The model's output matched neither the Action nor the Final Answer
    /// template. Recoverable: the orchestrator appends a corrective
    /// observation and retries within the iteration cap.
    #[error("malformed model output: {message}")]
    MalformedOutput {
        /// What was wrong with the output.
        message: String,
        /// The raw model output, kept for the corrective observation.
        content: String,
    },

    /// A tool invocation failed in a way the tool could not degrade.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Name of the failing tool.
        name: String,
        /// Failure detail.
        message: String,
    },

    /// Loop-level failures (invalid query, runtime wiring).
    #[error("orchestration error: {message}")]
    Orchestration {
        /// Failure detail.
        message: String,
    },
}

/// Errors from the publication source.
///
/// All variants are recoverable at the aggregation level except
/// [`SearchError::Client`], which is raised while constructing the source
/// and propagates as a hard failure.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The HTTP client could not be constructed.
    #[error("search client construction failed: {message}")]
    Client {
        /// Construction failure detail.
        message: String,
    },

    /// A search request failed in transport or was rejected by the provider.
    #[error("search request failed: {message}")]
    Request {
        /// Error detail.
        message: String,
        /// HTTP status code, if one was received.
        status: Option<u16>,
    },

    /// The provider's response could not be interpreted.
    #[error("malformed search response: {message}")]
    Parse {
        /// Parse failure detail.
        message: String,
    },

    /// A single pull exceeded the configured timeout.
    #[error("search call timed out after {seconds}s")]
    Timeout {
        /// The timeout that elapsed, in seconds.
        seconds: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_error_display() {
        let err = AgentError::ApiRequest {
            message: "connection refused".to_string(),
            status: None,
        };
        assert!(err.to_string().contains("connection refused"));

        let err = AgentError::CompletionTimeout { seconds: 120 };
        assert!(err.to_string().contains("120"));
    }

    #[test]
    fn test_malformed_output_keeps_content() {
        let err = AgentError::MalformedOutput {
            message: "no Action or Final Answer marker".to_string(),
            content: "I think the answer is 42".to_string(),
        };
        if let AgentError::MalformedOutput { content, .. } = &err {
            assert_eq!(content, "I think the answer is 42");
        }
    }

    #[test]
    fn test_search_error_display() {
        let err = SearchError::Request {
            message: "status 429".to_string(),
            status: Some(429),
        };
        assert!(err.to_string().contains("429"));

        let err = SearchError::Timeout { seconds: 30 };
        assert!(err.to_string().contains("30"));
    }
}

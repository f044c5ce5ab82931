//! Bounded reasoning/acting loop.
//!
//! Drives the engine ↔ tool round-trip: builds a prompt from the query,
//! tool catalog, and transcript, asks the engine for the next step,
//! dispatches the requested tool, and feeds its output back as an
//! observation. Malformed output is corrected in-loop rather than fatal;
//! the iteration cap bounds every path, including failed-parse retries,
//! so a non-conforming engine can never loop forever.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::config::AgentConfig;
use super::parser::{ParsedStep, parse_step};
use super::prompt::build_react_prompt;
use super::provider::CompletionProvider;
use super::run::{AgentRun, AgentStep, RunOutcome};
use super::tool::ToolSet;
use crate::error::AgentError;

/// Longest accepted query, in bytes.
const MAX_QUERY_LEN: usize = 10_000;

/// Orchestrates one agent run per user query.
///
/// Holds the provider, the registered tools, and the loop limits. Each
/// [`run`](Orchestrator::run) owns its own transcript and iteration
/// counter; nothing carries over between queries.
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    tools: ToolSet,
    max_iterations: usize,
    completion_timeout: std::time::Duration,
}

impl Orchestrator {
    /// Creates an orchestrator with the given provider and tool registry.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, tools: ToolSet, config: &AgentConfig) -> Self {
        Self {
            provider,
            tools,
            max_iterations: config.max_iterations,
            completion_timeout: config.completion_timeout,
        }
    }

    /// Runs the reasoning/acting loop for one query.
    ///
    /// Terminates with [`RunOutcome::FinalAnswer`] in the same cycle the
    /// engine emits one, or with a controlled bounded-failure outcome when
    /// the iteration cap is exhausted. Both are `Ok`; only fatal
    /// conditions (provider errors, completion timeout, tool failures the
    /// tool could not absorb) return `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on an empty or oversized query, provider
    /// failures, completion timeouts, or unabsorbed tool failures.
    pub async fn run(&self, query: &str) -> Result<AgentRun, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::Orchestration {
                message: "query cannot be empty".to_string(),
            });
        }
        if query.len() > MAX_QUERY_LEN {
            return Err(AgentError::Orchestration {
                message: format!(
                    "query exceeds maximum length ({} bytes, max {MAX_QUERY_LEN})",
                    query.len()
                ),
            });
        }

        let start = Instant::now();
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut iterations = 0usize;
        let mut last_cycle_failed = false;

        for iteration in 0..self.max_iterations {
            iterations = iteration + 1;

            let prompt = build_react_prompt(query, &self.tools, &steps);
            let raw = tokio::time::timeout(
                self.completion_timeout,
                self.provider.complete(&prompt),
            )
            .await
            .map_err(|_| AgentError::CompletionTimeout {
                seconds: self.completion_timeout.as_secs(),
            })??;

            match parse_step(&raw) {
                Ok(ParsedStep::FinalAnswer { thought, text }) => {
                    debug!(iteration, "final answer produced");
                    steps.push(AgentStep {
                        thought,
                        action: None,
                        action_input: String::new(),
                        observation: String::new(),
                    });
                    return Ok(AgentRun {
                        query: query.to_string(),
                        steps,
                        outcome: RunOutcome::FinalAnswer(text),
                        iterations,
                        elapsed: start.elapsed(),
                    });
                }
                Ok(ParsedStep::Action {
                    thought,
                    name,
                    input,
                }) => {
                    if let Some(tool) = self.tools.get(&name) {
                        debug!(iteration, tool = %name, "invoking tool");
                        let observation = tool.invoke(&input).await?;
                        steps.push(AgentStep::acted(thought, name, input, observation));
                        last_cycle_failed = false;
                    } else {
                        // An unregistered tool name is a parse failure: the
                        // engine is told the valid names and retries.
                        warn!(iteration, tool = %name, "unregistered tool requested");
                        let note = format!(
                            "Unknown tool '{name}'. The only valid tools are: [{}]. \
                             Choose one of them in your Action line.",
                            self.tools.names()
                        );
                        steps.push(AgentStep::corrective(raw, note));
                        last_cycle_failed = true;
                    }
                }
                Err(AgentError::MalformedOutput { message, content }) => {
                    debug!(iteration, %message, "unparsable output, correcting");
                    let note = format!(
                        "Invalid output format ({message}). Respond with exactly one of:\n\
                         Thought: <reasoning> Action: <one of [{}]> Action Input: <input>\n\
                         or\n\
                         Thought: <reasoning> Final Answer: <answer>",
                        self.tools.names()
                    );
                    steps.push(AgentStep::corrective(content, note));
                    last_cycle_failed = true;
                }
                Err(other) => return Err(other),
            }
        }

        let outcome = if last_cycle_failed {
            RunOutcome::ParsingErrorExhausted
        } else {
            RunOutcome::MaxIterationsReached
        };
        warn!(iterations, ?outcome, "iteration cap exhausted without a final answer");

        Ok(AgentRun {
            query: query.to_string(),
            steps,
            outcome,
            iterations,
            elapsed: start.elapsed(),
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("tools", &self.tools)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::tool::Tool;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    /// Provider replaying scripted responses, recording every prompt.
    struct ScriptedProvider {
        responses: Vec<String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: responses.iter().map(ToString::to_string).collect(),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            // Replay the last response once the script runs out.
            let index = call.min(self.responses.len().saturating_sub(1));
            self.responses
                .get(index)
                .cloned()
                .ok_or_else(|| AgentError::ApiRequest {
                    message: "script empty".to_string(),
                    status: None,
                })
        }
    }

    /// Provider whose calls never complete; exercises the timeout.
    struct StalledProvider;

    #[async_trait]
    impl CompletionProvider for StalledProvider {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, AgentError> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    struct FixedTool {
        observation: String,
    }

    #[async_trait]
    impl Tool for FixedTool {
        fn name(&self) -> &str {
            "search_literature"
        }

        fn description(&self) -> &str {
            "Finds publications for keywords."
        }

        async fn invoke(&self, _raw_input: &str) -> Result<String, AgentError> {
            Ok(self.observation.clone())
        }
    }

    fn toolset(observation: &str) -> ToolSet {
        let mut tools = ToolSet::new();
        tools.register(Box::new(FixedTool {
            observation: observation.to_string(),
        }));
        tools
    }

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|e| panic!("config build failed: {e}"))
    }

    fn orchestrator(provider: Arc<dyn CompletionProvider>, observation: &str) -> Orchestrator {
        Orchestrator::new(provider, toolset(observation), &config())
    }

    #[tokio::test]
    async fn test_immediate_final_answer() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Thought: I already know this.\nFinal Answer: Transformers dominate.",
        ]));
        let run = orchestrator(provider, "")
            .run("what dominates NLP?")
            .await
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(
            run.outcome,
            RunOutcome::FinalAnswer("Transformers dominate.".to_string())
        );
        assert_eq!(run.iterations, 1);
        assert_eq!(run.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_action_then_final_answer_feeds_observation_back() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Thought: I should search.\nAction: search_literature\nAction Input: quantum",
            "Thought: I now know the final answer\nFinal Answer: Two key papers exist.",
        ]));
        let orchestrator = orchestrator(provider.clone(), "1. Key Paper (2020)");

        let run = orchestrator
            .run("what is known about quantum?")
            .await
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(
            run.outcome,
            RunOutcome::FinalAnswer("Two key papers exist.".to_string())
        );
        assert_eq!(run.iterations, 2);
        assert_eq!(run.steps.len(), 2);
        assert_eq!(run.steps[0].action.as_deref(), Some("search_literature"));
        assert_eq!(run.steps[0].observation, "1. Key Paper (2020)");

        // The second prompt must replay the first observation.
        let prompts = provider
            .prompts
            .lock()
            .unwrap_or_else(|e| panic!("lock poisoned: {e}"));
        assert!(prompts[1].contains("Observation: 1. Key Paper (2020)"));
    }

    #[tokio::test]
    async fn test_unparsable_then_final_answer() {
        // Scenario: cycle 1 unparsable, cycle 2 valid final answer.
        let provider = Arc::new(ScriptedProvider::new(&[
            "Let me just talk freely about the topic instead.",
            "Thought: corrected myself\nFinal Answer: Done properly.",
        ]));
        let run = orchestrator(provider, "")
            .run("q")
            .await
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(run.outcome, RunOutcome::FinalAnswer("Done properly.".to_string()));
        assert_eq!(run.iterations, 2);
        assert_eq!(run.steps.len(), 2);
        assert!(run.steps[0].is_corrective());
        assert!(run.steps[0].observation.contains("Invalid output format"));
    }

    #[tokio::test]
    async fn test_never_conforming_engine_is_bounded() {
        // Scenario: every cycle unparsable, cap 5.
        let provider = Arc::new(ScriptedProvider::new(&["total nonsense, no markers"]));
        let run = orchestrator(provider.clone(), "")
            .run("q")
            .await
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(run.outcome, RunOutcome::ParsingErrorExhausted);
        assert_eq!(run.iterations, 5);
        assert_eq!(run.steps.len(), 5);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_endless_valid_actions_hit_cap() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Thought: search again\nAction: search_literature\nAction Input: more",
        ]));
        let run = orchestrator(provider, "No publications found.")
            .run("q")
            .await
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(run.outcome, RunOutcome::MaxIterationsReached);
        assert_eq!(run.iterations, 5);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_corrected() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Thought: use the web\nAction: web_search\nAction Input: x",
            "Thought: right\nFinal Answer: ok",
        ]));
        let run = orchestrator(provider, "")
            .run("q")
            .await
            .unwrap_or_else(|e| panic!("run failed: {e}"));

        assert_eq!(run.outcome, RunOutcome::FinalAnswer("ok".to_string()));
        assert!(run.steps[0].is_corrective());
        assert!(run.steps[0].observation.contains("Unknown tool 'web_search'"));
        assert!(run.steps[0].observation.contains("search_literature"));
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let provider = Arc::new(ScriptedProvider::new(&["x"]));
        let result = orchestrator(provider, "").run("   ").await;
        assert!(matches!(result, Err(AgentError::Orchestration { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_completion_times_out() {
        let mut config = config();
        config.completion_timeout = Duration::from_secs(5);
        let orchestrator = Orchestrator::new(Arc::new(StalledProvider), toolset(""), &config);

        let result = orchestrator.run("q").await;
        assert!(matches!(
            result,
            Err(AgentError::CompletionTimeout { seconds: 5 })
        ));
    }
}

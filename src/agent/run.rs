//! Data types for agent transcripts and run results.
//!
//! An [`AgentRun`] owns the ordered transcript of one query's
//! reasoning/acting cycles and the cause of termination. Runs are created
//! per query and discarded after the answer is surfaced; the orchestrator
//! keeps no cross-run state.

use serde::Serialize;
use std::time::Duration;

/// One reasoning/acting cycle's record. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStep {
    /// The model's reasoning text for this cycle. For corrective steps
    /// this is the raw, unparsable output.
    pub thought: String,
    /// Tool name the model chose; `None` for corrective steps.
    pub action: Option<String>,
    /// Raw input passed to the tool; empty for corrective steps.
    pub action_input: String,
    /// Tool output, or the corrective note for a parse failure.
    pub observation: String,
}

impl AgentStep {
    /// Builds a step recording a successful tool invocation.
    #[must_use]
    pub fn acted(thought: String, action: String, action_input: String, observation: String) -> Self {
        Self {
            thought,
            action: Some(action),
            action_input,
            observation,
        }
    }

    /// Builds a corrective step for output the loop could not parse.
    #[must_use]
    pub const fn corrective(raw_output: String, note: String) -> Self {
        Self {
            thought: raw_output,
            action: None,
            action_input: String::new(),
            observation: note,
        }
    }

    /// Returns `true` if this step records a parse failure.
    #[must_use]
    pub const fn is_corrective(&self) -> bool {
        self.action.is_none()
    }
}

/// Why a run terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", content = "answer", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The engine produced a final answer; the run succeeded.
    FinalAnswer(String),
    /// The iteration cap was exhausted and the last cycle still failed to
    /// parse. A controlled failure, not an error.
    ParsingErrorExhausted,
    /// The iteration cap was exhausted without a final answer, with the
    /// last cycle a valid action. A controlled failure, not an error.
    MaxIterationsReached,
}

impl RunOutcome {
    /// Returns the final answer text, if the run produced one.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::FinalAnswer(text) => Some(text),
            _ => None,
        }
    }
}

/// Result of one agent run: query, transcript, and termination cause.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    /// The user's original query.
    pub query: String,
    /// Ordered transcript of cycles.
    pub steps: Vec<AgentStep>,
    /// Termination cause.
    pub outcome: RunOutcome,
    /// Reasoning/acting cycles consumed, including failed-parse retries.
    pub iterations: usize,
    /// Wall-clock duration of the run.
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_duration<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrective_step_shape() {
        let step = AgentStep::corrective("garbage".to_string(), "fix it".to_string());
        assert!(step.is_corrective());
        assert!(step.action_input.is_empty());
        assert_eq!(step.observation, "fix it");
    }

    #[test]
    fn test_acted_step_shape() {
        let step = AgentStep::acted(
            "I should search".to_string(),
            "search_literature".to_string(),
            "quantum".to_string(),
            "1. Paper".to_string(),
        );
        assert!(!step.is_corrective());
        assert_eq!(step.action.as_deref(), Some("search_literature"));
    }

    #[test]
    fn test_outcome_answer_accessor() {
        let done = RunOutcome::FinalAnswer("42".to_string());
        assert_eq!(done.answer(), Some("42"));
        assert!(RunOutcome::MaxIterationsReached.answer().is_none());
        assert!(RunOutcome::ParsingErrorExhausted.answer().is_none());
    }

    #[test]
    fn test_run_serializes() {
        let run = AgentRun {
            query: "q".to_string(),
            steps: vec![AgentStep::corrective("x".to_string(), "y".to_string())],
            outcome: RunOutcome::ParsingErrorExhausted,
            iterations: 5,
            elapsed: Duration::from_millis(1500),
        };
        let json = serde_json::to_string(&run).unwrap_or_default();
        assert!(json.contains("parsing_error_exhausted"));
        assert!(json.contains("1.5"));
    }
}

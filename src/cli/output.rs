//! Output formatting for CLI results.

// Allow certain patterns that improve readability in CLI output formatting
#![allow(clippy::format_push_string)]

use anyhow::Context;

use crate::agent::run::{AgentRun, RunOutcome};
use crate::scholar::aggregator::Aggregation;
use crate::scholar::render::render_observation;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format string (case-insensitive); unknown values fall back
    /// to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats an agent run for display.
///
/// Text output is the final answer, or a definite no-answer line for the
/// bounded-failure outcomes; the caller sees an outcome either way, never
/// an empty string. JSON serializes the full run including the transcript.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_run(run: &AgentRun, format: OutputFormat, verbose: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut output = match &run.outcome {
                RunOutcome::FinalAnswer(text) => text.clone(),
                RunOutcome::ParsingErrorExhausted => format!(
                    "No answer produced: the reasoning engine never returned usable output \
                     within {} iterations.",
                    run.iterations
                ),
                RunOutcome::MaxIterationsReached => format!(
                    "No answer produced within {} iterations.",
                    run.iterations
                ),
            };
            if verbose {
                output.push_str(&format!(
                    "\n---\nIterations: {} | Steps: {} | Time: {:.1}s",
                    run.iterations,
                    run.steps.len(),
                    run.elapsed.as_secs_f64()
                ));
            }
            Ok(output)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(run).context("JSON serialization failed")
        }
    }
}

/// Formats a direct aggregation for display.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_aggregation(
    aggregation: &Aggregation,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut output = render_observation(&aggregation.publications);
            if verbose {
                output.push_str(&format!(
                    "\n---\nPublications: {} | Keywords: {} processed, {} failed",
                    aggregation.publications.len(),
                    aggregation.keywords_processed,
                    aggregation.keywords_failed
                ));
                for err in &aggregation.errors {
                    output.push_str(&format!("\nKeyword error: {err}"));
                }
            }
            Ok(output)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(aggregation).context("JSON serialization failed")
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::run::AgentStep;
    use std::time::Duration;

    fn run(outcome: RunOutcome) -> AgentRun {
        AgentRun {
            query: "q".to_string(),
            steps: vec![AgentStep::corrective("x".to_string(), "note".to_string())],
            outcome,
            iterations: 5,
            elapsed: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("weird"), OutputFormat::Text);
    }

    #[test]
    fn test_final_answer_text() {
        let formatted = format_run(
            &run(RunOutcome::FinalAnswer("The answer.".to_string())),
            OutputFormat::Text,
            false,
        )
        .unwrap_or_else(|e| panic!("format failed: {e}"));
        assert_eq!(formatted, "The answer.");
    }

    #[test]
    fn test_bounded_failure_text_is_not_empty() {
        for outcome in [
            RunOutcome::ParsingErrorExhausted,
            RunOutcome::MaxIterationsReached,
        ] {
            let formatted = format_run(&run(outcome), OutputFormat::Text, false)
                .unwrap_or_else(|e| panic!("format failed: {e}"));
            assert!(formatted.contains("No answer produced"));
            assert!(formatted.contains('5'));
        }
    }

    #[test]
    fn test_verbose_footer() {
        let formatted = format_run(
            &run(RunOutcome::FinalAnswer("A.".to_string())),
            OutputFormat::Text,
            true,
        )
        .unwrap_or_else(|e| panic!("format failed: {e}"));
        assert!(formatted.contains("Iterations: 5"));
    }

    #[test]
    fn test_json_run_includes_transcript() {
        let formatted = format_run(
            &run(RunOutcome::MaxIterationsReached),
            OutputFormat::Json,
            false,
        )
        .unwrap_or_else(|e| panic!("format failed: {e}"));
        assert!(formatted.contains("\"steps\""));
        assert!(formatted.contains("max_iterations_reached"));
    }

    #[test]
    fn test_aggregation_text_empty() {
        let aggregation = Aggregation::default();
        let formatted = format_aggregation(&aggregation, OutputFormat::Text, false)
            .unwrap_or_else(|e| panic!("format failed: {e}"));
        assert_eq!(formatted, "No publications found.");
    }
}

//! Parsing of raw reasoning-engine output.
//!
//! The engine is prompted to produce either an action segment
//! (`Thought: … Action: <tool> Action Input: <text>`) or a final segment
//! (`Thought: … Final Answer: <text>`). Real models drift from the
//! template, so extraction is marker-based and lenient about surrounding
//! text; output matching neither pattern is a recoverable
//! [`AgentError::MalformedOutput`], never a panic.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AgentError;

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*:\s*(?P<name>.*?)\s*Action\s*Input\s*:\s*(?P<input>.*)")
        .unwrap_or_else(|_| unreachable!("hardcoded pattern is valid"))
});

static FINAL_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Final\s*Answer\s*:\s*(?P<answer>.*)")
        .unwrap_or_else(|_| unreachable!("hardcoded pattern is valid"))
});

/// A successfully extracted step from raw engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedStep {
    /// The engine requested a tool invocation.
    Action {
        /// Reasoning text preceding the action marker.
        thought: String,
        /// Requested tool name.
        name: String,
        /// Raw action input.
        input: String,
    },
    /// The engine produced its final answer.
    FinalAnswer {
        /// Reasoning text preceding the final-answer marker.
        thought: String,
        /// The answer text, verbatim.
        text: String,
    },
}

/// Extracts an action or final answer from raw engine output.
///
/// A final answer takes the whole remainder of the text after its marker.
/// Output containing both an action and a final-answer marker is
/// ambiguous and rejected, as is output containing neither.
///
/// # Errors
///
/// Returns [`AgentError::MalformedOutput`] carrying the raw text when no
/// unambiguous segment can be extracted.
pub fn parse_step(raw: &str) -> Result<ParsedStep, AgentError> {
    let has_action = ACTION_RE.is_match(raw);
    let final_answer = FINAL_ANSWER_RE.captures(raw);

    if has_action && final_answer.is_some() {
        return Err(AgentError::MalformedOutput {
            message: "output contains both an Action and a Final Answer".to_string(),
            content: raw.to_string(),
        });
    }

    if let Some(captures) = final_answer {
        let answer_start = captures
            .get(0)
            .map_or(0, |m| m.start());
        return Ok(ParsedStep::FinalAnswer {
            thought: extract_thought(&raw[..answer_start]),
            text: captures["answer"].trim().to_string(),
        });
    }

    if let Some(captures) = ACTION_RE.captures(raw) {
        let action_start = captures.get(0).map_or(0, |m| m.start());
        let name = captures["name"].trim().to_string();
        // Engines sometimes quote the input; strip one layer.
        let input = captures["input"]
            .trim()
            .trim_matches('"')
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(AgentError::MalformedOutput {
                message: "Action marker present but tool name is empty".to_string(),
                content: raw.to_string(),
            });
        }
        return Ok(ParsedStep::Action {
            thought: extract_thought(&raw[..action_start]),
            name,
            input,
        });
    }

    Err(AgentError::MalformedOutput {
        message: "expected an Action/Action Input pair or a Final Answer".to_string(),
        content: raw.to_string(),
    })
}

/// Strips the leading `Thought:` label from the reasoning segment.
fn extract_thought(segment: &str) -> String {
    let trimmed = segment.trim();
    trimmed
        .strip_prefix("Thought:")
        .map_or(trimmed, str::trim)
        .to_string()
}

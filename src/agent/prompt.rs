//! ReAct prompt template and builders.
//!
//! Each cycle's prompt is rebuilt from scratch: the fixed template, the
//! tool catalog, the user's question, and a scratchpad replaying the
//! transcript so far. The engine continues from the trailing `Thought:`.

use std::fmt::Write;

use super::run::AgentStep;
use super::tool::ToolSet;

/// Fixed instruction block preceding the tool catalog.
const PREAMBLE: &str =
    "You are an academic literature research assistant. Answer the user's research question \
     by looking up relevant publications and summarizing what they show. \
     You have access to the following tools:";

/// Format instructions the engine must follow, with the tool names
/// substituted in.
const FORMAT_BLOCK: &str = "Use the following format:

Question: the research question you must answer
Thought: you should always think about what to do next
Action: the action to take, must be one of [{tool_names}]
Action Input: the input to the action (a keyword string)
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat)
Thought: I now know the final answer
Final Answer: the final answer to the original question, grounded in the publications found";

/// Builds the full prompt for one reasoning cycle.
#[must_use]
pub fn build_react_prompt(query: &str, tools: &ToolSet, steps: &[AgentStep]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{PREAMBLE}");
    let _ = writeln!(prompt);
    let _ = write!(prompt, "{}", tools.catalog());
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "{}",
        FORMAT_BLOCK.replace("{tool_names}", &tools.names())
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Begin!");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Question: {query}");
    let _ = write!(prompt, "Thought: {}", build_scratchpad(steps));
    prompt
}

/// Replays the transcript in template form, ending ready for the next
/// thought. Corrective steps replay the raw output followed by the
/// corrective observation, which is how the engine learns what to fix.
fn build_scratchpad(steps: &[AgentStep]) -> String {
    let mut scratchpad = String::new();
    for step in steps {
        let _ = writeln!(scratchpad, "{}", step.thought);
        if let Some(ref action) = step.action {
            let _ = writeln!(scratchpad, "Action: {action}");
            let _ = writeln!(scratchpad, "Action Input: {}", step.action_input);
        }
        let _ = writeln!(scratchpad, "Observation: {}", step.observation);
        let _ = write!(scratchpad, "Thought: ");
    }
    scratchpad
}

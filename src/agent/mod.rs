//! Agent system: the bounded reasoning/acting loop and its seams.
//!
//! # Architecture
//!
//! ```text
//! User query → Orchestrator
//!   ├── build ReAct prompt (query + tool catalog + transcript)
//!   ├── CompletionProvider::complete (per-call timeout)
//!   ├── parse: Action / Final Answer / corrective retry
//!   ├── ToolSet dispatch → Observation
//!   └── repeat, bounded by max_iterations
//! AgentRun { steps, outcome } → caller
//! ```
//!
//! The provider and tool seams are traits so the loop is testable against
//! scripted engines and canned tools; the iteration cap bounds every path,
//! including failed-parse retries.

pub mod client;
pub mod config;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod run;
pub mod tool;

// Re-export key types
pub use client::create_provider;
pub use config::AgentConfig;
pub use orchestrator::Orchestrator;
pub use parser::{ParsedStep, parse_step};
pub use provider::CompletionProvider;
pub use run::{AgentRun, AgentStep, RunOutcome};
pub use tool::{Tool, ToolSet};

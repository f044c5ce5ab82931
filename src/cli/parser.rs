//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Args, Parser, Subcommand};

/// scholar-rs: academic literature research agent.
///
/// Answers research questions by driving a reasoning loop over a
/// rate-limited publication search, grounded in up to five retrieved
/// publications per search.
#[derive(Parser, Debug)]
#[command(name = "scholar-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the agent-driven and direct-search commands.
#[derive(Args, Debug, Clone)]
pub struct SearchOpts {
    /// Model identifier for the reasoning engine.
    #[arg(long, env = "SCHOLAR_MODEL")]
    pub model: Option<String>,

    /// Maximum reasoning/acting cycles per query.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Global cap on publications per search.
    #[arg(short = 'k', long)]
    pub max_results: Option<usize>,

    /// Delay between source pulls, in milliseconds.
    #[arg(long)]
    pub search_delay_ms: Option<u64>,

    /// Egress proxy URL for the publication source (best-effort).
    #[arg(long, env = "SCHOLAR_PROXY")]
    pub proxy: Option<String>,

    /// Drop identical publications surfaced by more than one keyword.
    #[arg(long)]
    pub dedupe: bool,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one research question and print the synthesized answer.
    ///
    /// Runs the full reasoning loop: the engine decides when to search,
    /// reads the retrieved publications, and answers from them.
    #[command(after_help = r#"Examples:
  scholar-rs ask "recent advances in protein folding prediction"
  scholar-rs ask "climate change deep learning" --max-iterations 8
  scholar-rs --format json ask "graph neural networks for chemistry"
  SCHOLAR_API_KEY=sk-... scholar-rs ask "quantum error correction"
"#)]
    Ask {
        /// The research question.
        query: String,

        /// Shared search and engine options.
        #[command(flatten)]
        opts: SearchOpts,
    },

    /// Interactive loop: one research question per line.
    ///
    /// Reads a question, prints the answer or a per-query error, and asks
    /// whether to continue. Exits on a non-affirmative answer or EOF.
    Repl {
        /// Shared search and engine options.
        #[command(flatten)]
        opts: SearchOpts,
    },

    /// Search publications directly, bypassing the reasoning loop.
    ///
    /// Aggregates up to five publications for the given keywords and
    /// prints the listing. Useful for checking what the agent would see.
    #[command(after_help = r#"Examples:
  scholar-rs search "transformer interpretability"
  scholar-rs search "federated learning privacy" -k 3 --dedupe
  scholar-rs --format json search "LLM agents" | jq '.publications[].title'
"#)]
    Search {
        /// Space-separated keywords.
        query: String,

        /// Shared search options.
        #[command(flatten)]
        opts: SearchOpts,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["scholar-rs", "ask", "what is known about X?"])
            .unwrap_or_else(|e| unreachable!("parse failed: {e}"));
        match cli.command {
            Commands::Ask { query, opts } => {
                assert_eq!(query, "what is known about X?");
                assert!(opts.max_iterations.is_none());
            }
            other => unreachable!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_with_flags() {
        let cli = Cli::try_parse_from([
            "scholar-rs",
            "--format",
            "json",
            "search",
            "quantum computing",
            "-k",
            "3",
            "--dedupe",
        ])
        .unwrap_or_else(|e| unreachable!("parse failed: {e}"));
        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Search { query, opts } => {
                assert_eq!(query, "quantum computing");
                assert_eq!(opts.max_results, Some(3));
                assert!(opts.dedupe);
            }
            other => unreachable!("expected search, got {other:?}"),
        }
    }
}

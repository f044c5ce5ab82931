//! CLI command implementations.
//!
//! Contains the business logic for each CLI command. Commands build their
//! output as a string for `main` to print; the REPL is the exception and
//! talks to the terminal directly.

// The REPL reads and writes the terminal interactively.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, BufRead, Write as IoWrite};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::agent::client::create_provider;
use crate::agent::config::{AgentConfig, AgentConfigBuilder};
use crate::agent::orchestrator::Orchestrator;
use crate::agent::tool::ToolSet;
use crate::cli::output::{OutputFormat, format_aggregation, format_run};
use crate::cli::parser::{Cli, Commands, SearchOpts};
use crate::scholar::aggregator::{Aggregator, tokenize};
use crate::scholar::source::ScholarApiSource;
use crate::scholar::tool::LiteratureSearchTool;

/// Executes the parsed CLI command and returns its output.
///
/// # Errors
///
/// Returns an error on configuration, provider, or source construction
/// failures, or when a one-shot query fails fatally. REPL per-query
/// failures are reported inline and do not propagate.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    let format = OutputFormat::parse(&cli.format);
    match &cli.command {
        Commands::Ask { query, opts } => cmd_ask(query, opts, format, cli.verbose),
        Commands::Repl { opts } => cmd_repl(opts, format, cli.verbose),
        Commands::Search { query, opts } => cmd_search(query, opts, format, cli.verbose),
    }
}

/// Applies CLI overrides onto a config builder.
fn apply_opts(mut builder: AgentConfigBuilder, opts: &SearchOpts) -> AgentConfigBuilder {
    if let Some(ref model) = opts.model {
        builder = builder.model(model);
    }
    if let Some(n) = opts.max_iterations {
        builder = builder.max_iterations(n);
    }
    if let Some(k) = opts.max_results {
        builder = builder.max_results(k);
    }
    if let Some(ms) = opts.search_delay_ms {
        builder = builder.search_delay(Duration::from_millis(ms));
    }
    if let Some(ref proxy) = opts.proxy {
        builder = builder.proxy(proxy);
    }
    if opts.dedupe {
        builder = builder.dedupe(true);
    }
    builder
}

fn build_config(opts: &SearchOpts) -> anyhow::Result<AgentConfig> {
    apply_opts(AgentConfig::builder().from_env(), opts)
        .build()
        .context("agent configuration error")
}

/// Config for the direct-search path, which never calls the completion
/// provider: a missing API key is not an error here.
fn build_search_config(opts: &SearchOpts) -> anyhow::Result<AgentConfig> {
    let builder = apply_opts(AgentConfig::builder().from_env(), opts);
    builder
        .clone()
        .build()
        .or_else(|_| builder.api_key(String::new()).build())
        .context("search configuration error")
}

/// Wires provider, source, aggregator, and tool registry into an
/// orchestrator. Construction failures here are the fatal kind: without a
/// provider or a source client there is nothing to run.
fn build_orchestrator(config: &AgentConfig) -> anyhow::Result<Orchestrator> {
    let provider = create_provider(config).context("provider creation failed")?;
    let source = ScholarApiSource::new(config).context("publication source creation failed")?;
    let aggregator = Aggregator::new(Arc::new(source), config);

    let mut tools = ToolSet::new();
    tools.register(Box::new(LiteratureSearchTool::new(aggregator)));

    Ok(Orchestrator::new(Arc::from(provider), tools, config))
}

fn cmd_ask(
    query: &str,
    opts: &SearchOpts,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<String> {
    let config = build_config(opts)?;
    let orchestrator = build_orchestrator(&config)?;

    // Create tokio runtime as sync/async bridge
    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let run = rt
        .block_on(orchestrator.run(query))
        .context("query failed")?;

    format_run(&run, format, verbose)
}

fn cmd_search(
    query: &str,
    opts: &SearchOpts,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<String> {
    let config = build_search_config(opts)?;
    let source =
        ScholarApiSource::new(&config).context("publication source creation failed")?;
    let aggregator = Aggregator::new(Arc::new(source), &config);

    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let aggregation = rt.block_on(aggregator.aggregate(&tokenize(query)));

    format_aggregation(&aggregation, format, verbose)
}

fn cmd_repl(opts: &SearchOpts, format: OutputFormat, verbose: bool) -> anyhow::Result<String> {
    let config = build_config(opts)?;
    let orchestrator = build_orchestrator(&config)?;
    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Academic literature research assistant.");
    println!("Enter a research topic (e.g. 'climate change deep learning').");

    loop {
        print!("\n> ");
        let _ = io::stdout().flush();
        let Some(line) = lines.next() else { break };
        let line = line.context("failed to read input")?;
        let query = line.trim();
        if query.is_empty() {
            println!("Please enter a research topic.");
            continue;
        }

        // Fatal per-query failures are reported for this query only;
        // the loop stays ready for the next one.
        match rt.block_on(orchestrator.run(query)) {
            Ok(run) => match format_run(&run, format, verbose) {
                Ok(output) => println!("\n{output}"),
                Err(e) => eprintln!("Error: {e:#}"),
            },
            Err(e) => eprintln!("Query failed: {e}"),
        }

        print!("\nContinue searching? (y/n): ");
        let _ = io::stdout().flush();
        let Some(answer) = lines.next() else { break };
        let answer = answer.context("failed to read input")?;
        let answer = answer.trim();
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            break;
        }
    }

    Ok("Goodbye.".to_string())
}

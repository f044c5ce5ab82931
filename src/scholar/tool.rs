//! The `search_literature` tool.
//!
//! Adapts the aggregator to the [`Tool`] contract: whitespace-tokenizes the
//! engine's raw action input, aggregates publications, and renders the
//! observation text. Degrades to a "no results" observation on empty or
//! garbled input; keyword-level failures are already absorbed inside the
//! aggregator, so `invoke` itself is infallible in practice.

use async_trait::async_trait;
use tracing::debug;

use crate::agent::tool::Tool;
use crate::error::AgentError;

use super::aggregator::{Aggregator, tokenize};
use super::render::render_observation;

/// Name the reasoning engine uses to invoke literature search.
pub const LITERATURE_TOOL_NAME: &str = "search_literature";

const LITERATURE_TOOL_DESCRIPTION: &str =
    "Takes one or more space-separated keywords and returns up to 5 matching academic \
     publications with title, authors, year, abstract, URL, and citation count.";

/// Literature search capability backed by the [`Aggregator`].
pub struct LiteratureSearchTool {
    aggregator: Aggregator,
}

impl LiteratureSearchTool {
    /// Wraps an aggregator as the `search_literature` tool.
    #[must_use]
    pub const fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }
}

#[async_trait]
impl Tool for LiteratureSearchTool {
    fn name(&self) -> &str {
        LITERATURE_TOOL_NAME
    }

    fn description(&self) -> &str {
        LITERATURE_TOOL_DESCRIPTION
    }

    async fn invoke(&self, raw_input: &str) -> Result<String, AgentError> {
        let keywords = tokenize(raw_input);
        debug!(keywords = keywords.len(), "literature search invoked");

        let aggregation = self.aggregator.aggregate(&keywords).await;
        Ok(render_observation(&aggregation.publications))
    }
}

impl std::fmt::Debug for LiteratureSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteratureSearchTool")
            .field("aggregator", &self.aggregator)
            .finish()
    }
}

//! Multi-keyword publication aggregation.
//!
//! Pulls records keyword-by-keyword from a [`PublicationSource`], applying
//! a per-keyword cap, a global cap, a per-pull throttle, and a per-pull
//! timeout. One keyword's failure never aborts the whole aggregation: the
//! error is logged, recorded in the returned diagnostics, and processing
//! moves to the next keyword.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::agent::config::AgentConfig;

use super::record::Publication;
use super::source::PublicationSource;

/// Result of one aggregation pass: the capped publication list plus
/// machine-checkable counters for recoverable conditions.
#[derive(Debug, Default, Serialize)]
pub struct Aggregation {
    /// Publications in discovery order (first keyword first, first match
    /// first). Length never exceeds the configured global cap.
    pub publications: Vec<Publication>,
    /// Keywords attempted.
    pub keywords_processed: usize,
    /// Keywords that raised a recoverable error (open or mid-pull).
    pub keywords_failed: usize,
    /// Error messages from failed keywords.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Splits free-text input into whitespace-delimited keywords.
///
/// Empty or whitespace-only input yields an empty vector, which by
/// contract produces an empty aggregation without touching the source.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    input.split_whitespace().map(ToString::to_string).collect()
}

/// Aggregates publications across keywords against one source.
pub struct Aggregator {
    source: Arc<dyn PublicationSource>,
    max_results: usize,
    per_keyword_results: usize,
    throttle: std::time::Duration,
    pull_timeout: std::time::Duration,
    dedupe: bool,
}

impl Aggregator {
    /// Creates an aggregator over the given source with limits from config.
    #[must_use]
    pub fn new(source: Arc<dyn PublicationSource>, config: &AgentConfig) -> Self {
        Self {
            source,
            max_results: config.max_results,
            per_keyword_results: config.per_keyword_results,
            throttle: config.search_delay,
            pull_timeout: config.search_timeout,
            dedupe: config.dedupe,
        }
    }

    /// Pulls and normalizes up to the global cap of publications.
    ///
    /// For each keyword in order: opens a fresh cursor, pulls until the
    /// per-keyword cap, the global cap, or exhaustion, throttling after
    /// each successful pull. Keyword-level errors (including per-pull
    /// timeouts) are recorded and skipped. This function itself never
    /// fails; only source construction, which happens before the
    /// aggregator exists, is a hard error.
    pub async fn aggregate(&self, keywords: &[String]) -> Aggregation {
        let mut aggregation = Aggregation::default();
        let mut seen: HashSet<(String, Option<String>)> = HashSet::new();

        for keyword in keywords {
            if aggregation.publications.len() >= self.max_results {
                break;
            }
            aggregation.keywords_processed += 1;

            let mut cursor = match self.source.search(keyword).await {
                Ok(cursor) => cursor,
                Err(e) => {
                    warn!(keyword = %keyword, error = %e, "keyword search failed, skipping");
                    aggregation.keywords_failed += 1;
                    aggregation.errors.push(format!("{keyword}: {e}"));
                    continue;
                }
            };

            let mut pulled = 0usize;
            while pulled < self.per_keyword_results
                && aggregation.publications.len() < self.max_results
            {
                let record = match tokio::time::timeout(self.pull_timeout, cursor.next()).await {
                    Err(_) => {
                        warn!(keyword = %keyword, "pull timed out, skipping keyword");
                        aggregation.keywords_failed += 1;
                        aggregation.errors.push(format!(
                            "{keyword}: pull timed out after {}s",
                            self.pull_timeout.as_secs()
                        ));
                        break;
                    }
                    Ok(Err(e)) => {
                        warn!(keyword = %keyword, error = %e, "pull failed, skipping keyword");
                        aggregation.keywords_failed += 1;
                        aggregation.errors.push(format!("{keyword}: {e}"));
                        break;
                    }
                    // Exhaustion ends this keyword's contribution; not an error.
                    Ok(Ok(None)) => break,
                    Ok(Ok(Some(record))) => record,
                };

                pulled += 1;
                let publication = Publication::from(record);
                if self.dedupe && !seen.insert(publication.dedupe_key()) {
                    debug!(keyword = %keyword, title = %publication.title, "duplicate skipped");
                } else {
                    aggregation.publications.push(publication);
                }

                tokio::time::sleep(self.throttle).await;
            }
        }

        debug!(
            publications = aggregation.publications.len(),
            keywords = aggregation.keywords_processed,
            failed = aggregation.keywords_failed,
            "aggregation complete"
        );
        aggregation
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("source", &self.source.name())
            .field("max_results", &self.max_results)
            .field("per_keyword_results", &self.per_keyword_results)
            .field("throttle", &self.throttle)
            .field("dedupe", &self.dedupe)
            .finish()
    }
}

//! Publication source abstraction and the Semantic Scholar backend.
//!
//! A source opens a [`PublicationCursor`] per keyword. The cursor contract
//! makes exhaustion a first-class terminal state: `Ok(None)` means the
//! source has no more results for this keyword, and is distinct from
//! `Err(_)`, which means a pull failed. Implementations page through the
//! provider lazily so the aggregator only pays for the records it pulls.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::agent::config::AgentConfig;
use crate::error::SearchError;

use super::record::{AuthorField, RawRecord, YearField};

/// Semantic Scholar Graph API paper-search endpoint.
const SEARCH_ENDPOINT: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
/// Fields requested per paper.
const SEARCH_FIELDS: &str = "title,authors,year,abstract,url,citationCount";
/// Records fetched per page.
const PAGE_SIZE: usize = 10;

/// A searchable source of publication records.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Opens a fresh paginated cursor for one keyword.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the search cannot be initiated. The
    /// aggregator treats this as that keyword's failure, not a fatal one.
    async fn search(&self, keyword: &str) -> Result<Box<dyn PublicationCursor>, SearchError>;
}

/// A stateful handle over one keyword's paginated results.
#[async_trait]
pub trait PublicationCursor: Send {
    /// Pulls the next record.
    ///
    /// Returns `Ok(Some(record))` while records remain, `Ok(None)` once the
    /// source is exhausted for this keyword.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport or decode failures mid-stream.
    async fn next(&mut self) -> Result<Option<RawRecord>, SearchError>;
}

/// Publication source backed by the Semantic Scholar Graph API.
///
/// Holds a configured HTTP client; each [`search`](PublicationSource::search)
/// call opens an independent offset-paginated cursor. The optional API key
/// raises the provider's rate limits but is not required.
pub struct ScholarApiSource {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl ScholarApiSource {
    /// Creates a source from agent configuration.
    ///
    /// Proxy application is best-effort: an unusable proxy URL logs a
    /// warning and the client proceeds unproxied.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Client`] if the HTTP client cannot be
    /// constructed. This is the one hard failure of the search side.
    pub fn new(config: &AgentConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder().timeout(config.search_timeout);

        if let Some(ref proxy_url) = config.proxy {
            match reqwest::Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => {
                    warn!(proxy = %proxy_url, error = %e, "proxy configuration failed, continuing unproxied");
                }
            }
        }

        let client = builder.build().map_err(|e| SearchError::Client {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: config.search_api_key.clone(),
            base_url: SEARCH_ENDPOINT.to_string(),
            timeout: config.search_timeout,
        })
    }

    /// Overrides the search endpoint (local mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl std::fmt::Debug for ScholarApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScholarApiSource")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

#[async_trait]
impl PublicationSource for ScholarApiSource {
    fn name(&self) -> &'static str {
        "semantic-scholar"
    }

    async fn search(&self, keyword: &str) -> Result<Box<dyn PublicationCursor>, SearchError> {
        Ok(Box::new(ApiCursor {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            keyword: keyword.to_string(),
            timeout: self.timeout,
            offset: 0,
            page: VecDeque::new(),
            exhausted: false,
        }))
    }
}

/// Offset-paginated cursor over the paper-search endpoint.
///
/// Buffers one page at a time; a short page or a missing `next` marker in
/// the response flags exhaustion so no trailing empty request is made.
struct ApiCursor {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    keyword: String,
    timeout: Duration,
    offset: usize,
    page: VecDeque<RawRecord>,
    exhausted: bool,
}

impl ApiCursor {
    async fn fetch_page(&mut self) -> Result<(), SearchError> {
        debug!(keyword = %self.keyword, offset = self.offset, "fetching result page");

        let offset = self.offset.to_string();
        let limit = PAGE_SIZE.to_string();
        let mut request = self.client.get(&self.base_url).query(&[
            ("query", self.keyword.as_str()),
            ("offset", offset.as_str()),
            ("limit", limit.as_str()),
            ("fields", SEARCH_FIELDS),
        ]);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout {
                    seconds: self.timeout.as_secs(),
                }
            } else {
                SearchError::Request {
                    message: e.to_string(),
                    status: e.status().map(|s| s.as_u16()),
                }
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Request {
                message: format!("status {status}: {body}"),
                status: Some(status.as_u16()),
            });
        }

        let payload: serde_json::Value =
            response.json().await.map_err(|e| SearchError::Parse {
                message: e.to_string(),
            })?;

        let data = payload
            .get("data")
            .and_then(|v| v.as_array())
            .ok_or_else(|| SearchError::Parse {
                message: "missing data array".to_string(),
            })?;

        // A short page, or no continuation marker, means this was the last one.
        if data.len() < PAGE_SIZE || payload.get("next").is_none() {
            self.exhausted = true;
        }
        self.offset += data.len();

        for paper in data {
            self.page.push_back(raw_record_from_paper(paper));
        }
        Ok(())
    }
}

#[async_trait]
impl PublicationCursor for ApiCursor {
    async fn next(&mut self) -> Result<Option<RawRecord>, SearchError> {
        if self.page.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }
        Ok(self.page.pop_front())
    }
}

/// Maps one paper object from the Graph API into the loose [`RawRecord`]
/// shape. Every extraction is best-effort; normalization supplies fallbacks.
fn raw_record_from_paper(paper: &serde_json::Value) -> RawRecord {
    let title = paper
        .get("title")
        .and_then(|v| v.as_str())
        .map(ToString::to_string);

    let authors = paper.get("authors").and_then(|v| v.as_array()).map(|list| {
        AuthorField::Many(
            list.iter()
                .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
                .map(ToString::to_string)
                .collect(),
        )
    });

    let pub_year = paper
        .get("year")
        .and_then(serde_json::Value::as_i64)
        .map(YearField::Number);

    let abstract_text = paper
        .get("abstract")
        .and_then(|v| v.as_str())
        .map(ToString::to_string);

    let pub_url = paper
        .get("url")
        .and_then(|v| v.as_str())
        .map(ToString::to_string);

    let citedby = paper.get("citationCount").and_then(serde_json::Value::as_i64);

    RawRecord {
        title,
        author: authors,
        pub_year,
        abstract_text,
        pub_url,
        citedby,
    }
}

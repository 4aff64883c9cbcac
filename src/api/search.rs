//! Full-text search service: the pagination accumulator.

use std::collections::HashSet;
use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{SearchPage, SearchQuery, SearchResult};
use crate::{Error, Result};

/// Search endpoint path, relative to the API base URL.
pub const SEARCH_PATH: &str = "content/search/sciencedirect";

/// Service for full-text search over ScienceDirect.
///
/// One [`execute`](Self::execute) call walks the result set page by
/// page, sequentially, merging pages into one [`SearchResult`]. Pages
/// are never fetched in parallel: each fetch's offset depends on the
/// previous page.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: scidirect::SciDirectClient) -> scidirect::Result<()> {
/// use scidirect::SearchQuery;
///
/// let query = SearchQuery::new("mice")
///     .journal("Developmental Biology")
///     .max_results(250);
///
/// let result = client.search().execute(&query).await?;
/// if result.truncated {
///     println!("stopped early: kept {} of {}", result.len(), result.total_available);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    inner: Arc<ClientInner>,
}

impl SearchService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Execute the search, accumulating pages until the declared total
    /// is reached, the cap binds, or the pages run out.
    ///
    /// Results are deduplicated by PII: a page reintroducing an
    /// already-seen identifier contributes nothing, and the duplicate
    /// does not count against the cap. The cap binds at request-size
    /// calculation, so the API is never asked for more records than
    /// the budget allows.
    ///
    /// A failure after at least one page succeeded does not discard
    /// what was collected: the partial result comes back with
    /// `truncated = true` and the error attached via
    /// [`SearchResult::failure`]. Only a first-page failure
    /// propagates as `Err`.
    pub async fn execute(&self, query: &SearchQuery) -> Result<SearchResult> {
        let mut collected = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut total: u64 = 0;
        let mut offset = 0usize;
        let mut first_page = true;

        loop {
            let budget = query.max_results.saturating_sub(collected.len());
            if budget == 0 {
                break;
            }
            let show = query.page_size.min(budget);

            let page = match self.fetch_page(query, offset, show).await {
                Ok(page) => page,
                Err(err) if first_page => return Err(err),
                Err(err) => {
                    tracing::warn!(%offset, %err, "search interrupted, returning partial result");
                    return Ok(SearchResult {
                        items: collected,
                        total_available: total,
                        truncated: true,
                        failure: Some(err),
                    });
                }
            };
            first_page = false;

            // The declared total may drift between pages; the latest
            // value is presumed freshest.
            total = page.results_found;

            if page.results.is_empty() {
                break;
            }
            offset += page.results.len();

            for article in page.results {
                if let Some(pii) = &article.pii {
                    if !seen.insert(pii.as_str().to_string()) {
                        continue;
                    }
                }
                if collected.len() < query.max_results {
                    collected.push(article);
                }
            }

            if collected.len() >= query.max_results || collected.len() as u64 >= total {
                break;
            }
        }

        let truncated = (collected.len() as u64) < total;
        Ok(SearchResult {
            items: collected,
            total_available: total,
            truncated,
            failure: None,
        })
    }

    /// Number of records matching the query, via one minimal request.
    pub async fn count(&self, query: &SearchQuery) -> Result<u64> {
        let page = self.fetch_page(query, 0, 1).await?;
        Ok(page.results_found)
    }

    async fn fetch_page(&self, query: &SearchQuery, offset: usize, show: usize) -> Result<SearchPage> {
        let payload = query.payload(offset, show);
        let envelope = self.inner.put_json(SEARCH_PATH, &payload).await?;

        serde_json::from_value(envelope.body.clone()).map_err(|err| Error::MalformedResponse {
            message: format!("search page did not match expected shape: {err}"),
            raw: envelope.body.to_string(),
        })
    }
}

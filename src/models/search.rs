//! Search query specification and result models.
//!
//! The ScienceDirect full-text search uses a PUT endpoint that takes a
//! JSON payload (`qs`, `pub`, `loadedAfter`, `display`) and answers
//! with `{"resultsFound": N, "results": [...]}`. The types here model
//! both directions of that exchange plus the accumulated result the
//! search service hands back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{Doi, Pii};
use crate::Error;

/// Default number of results requested per API call.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default overall cap on accumulated results, to be polite to the API.
pub const DEFAULT_MAX_RESULTS: usize = 5000;

/// Specification of one full-text search.
///
/// Immutable once built; each [`execute`](crate::api::SearchService::execute)
/// call walks the result set fresh from offset 0.
///
/// # Example
///
/// ```
/// use scidirect::SearchQuery;
///
/// let query = SearchQuery::new("mice")
///     .journal("Developmental Biology")
///     .page_size(100)
///     .max_results(250);
/// ```
#[derive(Debug, Clone)]
pub struct SearchQuery {
    query: String,
    journal: Option<String>,
    loaded_after: Option<DateTime<Utc>>,
    sort_by: Option<String>,
    fields: Vec<String>,
    pub(crate) page_size: usize,
    pub(crate) max_results: usize,
}

impl SearchQuery {
    /// Create a query searching the full text (minus references) for
    /// the given terms. Supports `AND`, `OR`, and quoted phrases.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            journal: None,
            loaded_after: None,
            sort_by: None,
            fields: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Restrict to a publication title. The API matches words and
    /// quoted phrases, not exact titles, so "Developmental Biology"
    /// also matches "Current Topics in Developmental Biology".
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    /// Only return articles loaded into ScienceDirect after this
    /// instant. The API supports no other date filter.
    pub fn loaded_after(mut self, after: DateTime<Utc>) -> Self {
        self.loaded_after = Some(after);
        self
    }

    /// Sort order, e.g. `"date"` or `"relevance"`.
    pub fn sort_by(mut self, sort: impl Into<String>) -> Self {
        self.sort_by = Some(sort.into());
        self
    }

    /// Restrict which fields the API returns for each result record.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Number of results to request per API call. Clamped to at least
    /// 1; the API rejects a requested page size of zero.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Overall cap on accumulated results across all pages.
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Build the PUT payload for one page fetch.
    pub(crate) fn payload(&self, offset: usize, show: usize) -> Value {
        #[derive(Serialize)]
        struct Display<'a> {
            offset: usize,
            show: usize,
            #[serde(rename = "sortBy", skip_serializing_if = "Option::is_none")]
            sort_by: Option<&'a str>,
        }

        #[derive(Serialize)]
        struct Payload<'a> {
            qs: &'a str,
            #[serde(rename = "pub", skip_serializing_if = "Option::is_none")]
            journal: Option<String>,
            #[serde(rename = "loadedAfter", skip_serializing_if = "Option::is_none")]
            loaded_after: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            field: Option<String>,
            display: Display<'a>,
        }

        let payload = Payload {
            qs: &self.query,
            // Quote the journal so multi-word titles search as a phrase.
            journal: self.journal.as_ref().map(|j| format!("\"{j}\"")),
            loaded_after: self
                .loaded_after
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            field: if self.fields.is_empty() {
                None
            } else {
                Some(self.fields.join(","))
            },
            display: Display {
                offset,
                show,
                sort_by: self.sort_by.as_deref(),
            },
        };

        // Serialization of this payload shape cannot fail.
        serde_json::to_value(payload).unwrap_or(Value::Null)
    }
}

/// One article record as returned by the search endpoint.
///
/// Fields not modeled here are preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Publisher Item Identifier; the dedup key during accumulation.
    pub pii: Option<Pii>,
    /// Digital Object Identifier.
    pub doi: Option<Doi>,
    /// Article title.
    pub title: Option<String>,
    /// Journal title.
    pub source_title: Option<String>,
    /// When the article was loaded into ScienceDirect (RFC 3339).
    pub load_date: Option<String>,
    /// Publication date (RFC 3339 or `YYYY-MM-DD`).
    pub publication_date: Option<String>,
    /// Unmodeled fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One page of the search result set, as decoded off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Result records in API order. Absent on empty result sets.
    #[serde(default)]
    pub results: Vec<Article>,
    /// The API's declared total for the whole result set. May change
    /// between pages; the accumulator takes the last-seen value.
    #[serde(rename = "resultsFound", default, deserialize_with = "lenient_u64")]
    pub results_found: u64,
}

/// The API serializes `resultsFound` as a number or a numeric string
/// depending on endpoint version; accept both.
fn lenient_u64<'de, D>(de: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::Number(n) => Ok(n.as_u64().unwrap_or(0)),
        Value::String(s) => Ok(s.parse().unwrap_or(0)),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!(
            "expected number for resultsFound, got {other}"
        ))),
    }
}

/// The accumulated output of one search: all collected pages merged
/// into one ordered, deduplicated collection.
#[derive(Debug, Default)]
pub struct SearchResult {
    /// Collected records, in page-arrival order, unique by PII.
    pub items: Vec<Article>,
    /// The API's declared total for the result set (last-seen value).
    pub total_available: u64,
    /// True when collection stopped before `total_available` was
    /// reached: the cap bound, a later page failed, or the pages ran
    /// out early (the server delivered fewer records than it
    /// declared).
    pub truncated: bool,
    /// The error that interrupted accumulation, when one did. Always
    /// paired with `truncated = true`.
    pub failure: Option<Error>,
}

impl SearchResult {
    /// Number of collected records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no records were collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when every available record was collected.
    pub fn is_complete(&self) -> bool {
        !self.truncated
    }

    /// The error that cut accumulation short, if any.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Iterate over collected records.
    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.items.iter()
    }

    /// Consume the result, yielding the collected records.
    pub fn into_items(self) -> Vec<Article> {
        self.items
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

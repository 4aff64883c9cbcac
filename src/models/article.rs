//! Article detail records fetched per PII.
//!
//! The search results carry only a handful of fields; the rest of an
//! article's metadata (PMID, publication type, abstract, volume) comes
//! from a separate `content/article/pii/{pii}` retrieval, modeled here.

use serde_json::Value;

use crate::{Error, Result};

/// Metadata for one article, decoded from the
/// `full-text-retrieval-response` wrapper of the article endpoint.
#[derive(Debug, Clone)]
pub struct ArticleDetails {
    /// PubMed identifier. Articles can appear in ScienceDirect before
    /// their PMID does, so this is often absent for fresh articles.
    pub pmid: Option<String>,
    /// Publication type, e.g. `"fla"` for full-length article.
    pub pub_type: Option<String>,
    /// Abstract text (`dc:description`).
    pub abstract_text: Option<String>,
    /// Journal volume (`prism:volume`).
    pub volume: Option<String>,
    /// The full `coredata` object, for fields not modeled above.
    pub coredata: Value,
}

impl ArticleDetails {
    /// Decode the article endpoint's response body.
    ///
    /// A body without the `full-text-retrieval-response` wrapper is an
    /// API contract violation and fails rather than yielding an empty
    /// record.
    pub(crate) fn from_body(body: &Value) -> Result<Self> {
        let retrieval = body.get("full-text-retrieval-response").ok_or_else(|| {
            Error::MalformedResponse {
                message: "missing full-text-retrieval-response wrapper".to_string(),
                raw: body.to_string(),
            }
        })?;

        let coredata = retrieval.get("coredata").cloned().unwrap_or(Value::Null);
        let str_field = |v: &Value, key: &str| {
            v.get(key).and_then(Value::as_str).map(str::to_string)
        };

        Ok(Self {
            pmid: str_field(retrieval, "pubmed-id"),
            pub_type: str_field(&coredata, "pubType"),
            abstract_text: str_field(&coredata, "dc:description"),
            volume: str_field(&coredata, "prism:volume"),
            coredata,
        })
    }
}

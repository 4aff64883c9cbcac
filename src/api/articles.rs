//! Article retrieval service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{ArticleDetails, Pii};
use crate::Result;

/// Service for retrieving article metadata and PDFs by PII.
///
/// Search results carry only a few fields; the PMID, abstract, and
/// publication type require this per-article retrieval. Articles can
/// appear in ScienceDirect before their PMID does, so callers polling
/// for PubMed-linked articles should expect [`ArticleDetails::pmid`]
/// to be absent for a while.
pub struct ArticlesService {
    inner: Arc<ClientInner>,
}

impl ArticlesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch the detail metadata for one article.
    pub async fn details(&self, pii: &Pii) -> Result<ArticleDetails> {
        let envelope = self
            .inner
            .get_json(&format!("content/article/pii/{pii}"))
            .await?;
        ArticleDetails::from_body(&envelope.body)
    }

    /// Download the article PDF.
    pub async fn pdf(&self, pii: &Pii) -> Result<Vec<u8>> {
        self.inner
            .get_bytes(&format!("content/article/pii/{pii}"))
            .await
    }
}

//! # scidirect
//!
//! A Rust client for the Elsevier ScienceDirect full-text search API.
//!
//! This crate talks to the ScienceDirect PUT search interface, walks
//! paginated result sets into one merged collection, and retrieves
//! per-article metadata and PDFs, all through a single throttled
//! request path that respects the API's remote-declared quota.
//!
//! ## Features
//!
//! - **Throttled requests**: the client tracks the quota headers on
//!   every response and blocks before the quota would go negative;
//!   a 429 forces a backoff even when the headers are missing
//! - **Paginated search**: pages are fetched sequentially and merged
//!   in arrival order, deduplicated by PII, capped at a configurable
//!   maximum without over-fetching
//! - **Partial results**: a failure mid-pagination returns what was
//!   already collected, flagged as truncated with the error attached
//! - **Diagnostics**: a daily access log and a last-query JSON dump,
//!   both injectable observers that tests can replace
//! - **Article retrieval**: metadata (PMID, abstract, volume) and PDF
//!   download per PII
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scidirect::{Credentials, SciDirectClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> scidirect::Result<()> {
//!     let client = SciDirectClient::new(Credentials::from_env()?)?;
//!
//!     let query = SearchQuery::new("mice")
//!         .journal("Developmental Biology")
//!         .max_results(250);
//!
//!     let result = client.search().execute(&query).await?;
//!     println!(
//!         "collected {} of {} matching articles",
//!         result.len(),
//!         result.total_available
//!     );
//!
//!     // Fetch details for the first hit
//!     if let Some(pii) = result.iter().find_map(|a| a.pii.clone()) {
//!         let details = client.articles().details(&pii).await?;
//!         println!("PMID: {:?}", details.pmid);
//!     }
//!
//!     // Persist the run
//!     scidirect::sink::write_json(&result, "results.json")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod sink;

// Re-export primary types at crate root for convenience
pub use client::{ClientBuilder, ClientConfig, QuotaState, SciDirectClient};
pub use error::{Error, Result};
pub use models::{Article, Credentials, Doi, Pii, SearchQuery, SearchResult};

/// Prelude module for convenient imports.
///
/// ```rust
/// use scidirect::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{ArticlesService, SearchService};
    pub use crate::client::{
        AccessLog, ClientConfig, JsonDumpSink, QuotaState, ResponseObserver, SciDirectClient,
    };
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Article, ArticleDetails, Credentials, Doi, Pii, SearchQuery, SearchResult,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pii_newtype() {
        let pii = Pii::new("S0021925821005226");
        assert_eq!(pii.as_str(), "S0021925821005226");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(
            client::DEFAULT_BASE_URL,
            "https://api.elsevier.com/"
        );
    }
}

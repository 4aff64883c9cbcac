//! Data models for the ScienceDirect API.
//!
//! - [`primitives`] - identifier newtypes and credentials
//! - [`search`] - query specification, wire pages, accumulated results
//! - [`article`] - per-article detail records

pub mod article;
pub mod primitives;
pub mod search;

pub use article::ArticleDetails;
pub use primitives::{Credentials, Doi, Pii};
pub use search::{
    Article, SearchPage, SearchQuery, SearchResult, DEFAULT_MAX_RESULTS, DEFAULT_PAGE_SIZE,
};

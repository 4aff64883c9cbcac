//! API service modules for ScienceDirect endpoints.
//!
//! Each service is handed out by [`crate::SciDirectClient`] and shares
//! the client's throttled request path and quota state.

mod articles;
mod search;

pub use articles::ArticlesService;
pub use search::{SearchService, SEARCH_PATH};

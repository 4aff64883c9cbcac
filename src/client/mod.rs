//! HTTP client layer for the ScienceDirect API.
//!
//! [`SciDirectClient`] is the entry point: it owns the shared quota
//! state, throttles every outgoing request, and hands out the service
//! structs in [`crate::api`].
//!
//! # Example
//!
//! ```no_run
//! use scidirect::{Credentials, SciDirectClient, SearchQuery};
//!
//! # async fn example() -> scidirect::Result<()> {
//! let client = SciDirectClient::new(Credentials::new("api-key"))?;
//! let result = client.search().execute(&SearchQuery::new("CRISPR")).await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub mod envelope;
mod http;
pub mod observer;
mod quota;
pub mod transport;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use envelope::{QuotaSnapshot, ResponseEnvelope};
pub use http::{ClientBuilder, SciDirectClient};
pub use observer::{AccessLog, JsonDumpSink, ResponseObserver, DEFAULT_DUMP_FILE};
pub use quota::QuotaState;
pub use transport::{Clock, HttpTransport, Method, RawResponse, SystemClock, Transport, TransportRequest};

pub(crate) use http::ClientInner;

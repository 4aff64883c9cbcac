//! Pluggable transport and clock.
//!
//! The client talks to the network through the [`Transport`] trait and
//! reads time through the [`Clock`] trait. Production uses
//! [`HttpTransport`] (reqwest) and [`SystemClock`]; tests substitute
//! scripted implementations to drive throttling and pagination without
//! a live API.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use url::Url;

use crate::Result;

/// Type alias for a boxed future used by the object-safe traits below.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The HTTP methods the ScienceDirect API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET, for article retrieval. Carries no body.
    Get,
    /// PUT, for the search endpoint. Carries a JSON payload.
    Put,
}

impl Method {
    /// The method name as it appears on the wire and in access logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared request, ready for a [`Transport`] to execute.
#[derive(Debug)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers, credentials included.
    pub headers: HeaderMap,
    /// Serialized JSON payload; present iff the method is PUT.
    pub body: Option<Vec<u8>>,
}

/// The undecoded response a [`Transport`] hands back.
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, quota headers included.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

/// Executes prepared requests. The one seam between this crate and the
/// network.
pub trait Transport: Send + Sync {
    /// Execute the request, returning the raw response or a
    /// transport-level error.
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<RawResponse>>;
}

/// Production transport over [`reqwest::Client`].
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the given request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: TransportRequest) -> BoxFuture<'_, Result<RawResponse>> {
        Box::pin(async move {
            let mut builder = match request.method {
                Method::Get => self.http.get(request.url),
                Method::Put => self.http.put(request.url),
            };
            builder = builder.headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();

            Ok(RawResponse {
                status,
                headers,
                body,
            })
        })
    }
}

/// Time source for throttling decisions.
///
/// The sleep is implemented as a plain future, so a caller that drops
/// the in-flight request cancels the wait with it.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend for the given duration.
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Wall-clock time via `tokio::time`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

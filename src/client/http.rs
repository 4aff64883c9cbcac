//! HTTP client implementation for the ScienceDirect API.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use secrecy::ExposeSecret;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::api::{ArticlesService, SearchService};
use crate::models::Credentials;
use crate::{Error, Result};

use super::config::ClientConfig;
use super::envelope::{QuotaSnapshot, ResponseEnvelope};
use super::observer::{AccessLog, JsonDumpSink, ResponseObserver};
use super::quota::{QuotaState, RATE_LIMIT_BACKOFF};
use super::transport::{
    Clock, HttpTransport, Method, RawResponse, SystemClock, Transport, TransportRequest,
};

/// API key request header.
const HEADER_API_KEY: &str = "X-ELS-APIKey";
/// Institutional token request header.
const HEADER_INST_TOKEN: &str = "X-ELS-Insttoken";

/// The main client for the ScienceDirect API.
///
/// One client owns one quota: every request issued through it, from
/// any number of concurrent searches, is throttled against the same
/// remote-declared rate limit. Cloning is cheap and shares the quota.
///
/// # Example
///
/// ```no_run
/// use scidirect::{Credentials, SciDirectClient, SearchQuery};
///
/// # async fn example() -> scidirect::Result<()> {
/// let client = SciDirectClient::new(Credentials::from_env()?)?;
///
/// let result = client
///     .search()
///     .execute(&SearchQuery::new("mice").journal("Neuron"))
///     .await?;
/// println!("collected {} of {}", result.len(), result.total_available);
/// # Ok(())
/// # }
/// ```
pub struct SciDirectClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) observers: Vec<Arc<dyn ResponseObserver>>,
    pub(crate) quota: Mutex<QuotaState>,
    pub(crate) credentials: Credentials,
    pub(crate) config: ClientConfig,
}

impl SciDirectClient {
    /// Create a client with the default configuration and the standard
    /// diagnostic artifacts: the `dump.json` last-query dump and the
    /// daily access log under `logs/`.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).with_default_observers().build()
    }

    /// Start building a client with custom configuration, transport,
    /// clock, or observers. A builder starts with no observers.
    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            credentials,
            config: ClientConfig::default(),
            transport: None,
            clock: None,
            observers: Vec::new(),
        }
    }

    /// Get the search service.
    pub fn search(&self) -> SearchService {
        SearchService::new(self.inner.clone())
    }

    /// Get the article retrieval service.
    pub fn articles(&self) -> ArticlesService {
        ArticlesService::new(self.inner.clone())
    }

    /// Snapshot of the current quota state.
    pub async fn quota(&self) -> QuotaState {
        self.inner.quota.lock().await.clone()
    }
}

impl Clone for SciDirectClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for SciDirectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SciDirectClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Builder for [`SciDirectClient`].
pub struct ClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    transport: Option<Box<dyn Transport>>,
    clock: Option<Box<dyn Clock>>,
    observers: Vec<Arc<dyn ResponseObserver>>,
}

impl ClientBuilder {
    /// Use the given configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Substitute the transport. Used by tests to script responses.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Substitute the clock. Used by tests to verify throttling
    /// without real sleeps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Register an observer, notified after every response.
    pub fn with_observer(mut self, observer: impl ResponseObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Register the standard diagnostic observers: `dump.json` and the
    /// daily access log under `logs/`.
    pub fn with_default_observers(mut self) -> Self {
        self.observers.push(Arc::new(JsonDumpSink::default()));
        self.observers.push(Arc::new(AccessLog::new("logs")));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SciDirectClient> {
        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(HttpTransport::new(
                self.config.timeout,
                &self.config.user_agent,
            )?),
        };
        let clock: Box<dyn Clock> = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        Ok(SciDirectClient {
            inner: Arc::new(ClientInner {
                transport,
                clock,
                observers: self.observers,
                quota: Mutex::new(QuotaState::default()),
                credentials: self.credentials,
                config: self.config,
            }),
        })
    }
}

impl ClientInner {
    /// Build request headers with credentials. Credentials travel only
    /// here, never in the URL or body.
    fn build_headers(&self, accept: &'static str, has_body: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(self.credentials.api_key.expose_secret())
            .map_err(|_| Error::InvalidInput("API key is not a valid header value".into()))?;
        api_key.set_sensitive(true);
        headers.insert(HEADER_API_KEY, api_key);

        if let Some(token) = &self.credentials.inst_token {
            let mut token = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
                Error::InvalidInput("institutional token is not a valid header value".into())
            })?;
            token.set_sensitive(true);
            headers.insert(HEADER_INST_TOKEN, token);
        }

        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|_| Error::InvalidInput("user agent is not a valid header value".into()))?,
        );

        Ok(headers)
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&self.config.base_url)?.join(path)?)
    }

    /// Wait out the quota and the pacing interval, then claim one call.
    ///
    /// Runs as a single critical section: the lock is held across the
    /// waits, so a concurrent caller cannot observe `remaining > 0`
    /// and slip past while this one sleeps. Dropping the future
    /// cancels the wait.
    async fn throttle(&self) {
        let mut quota = self.quota.lock().await;

        if let Some(wait) = quota.quota_wait(self.clock.now()) {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "quota exhausted, waiting");
            self.clock.sleep(wait).await;
            quota.clear_exhaustion();
        }

        if let Some(wait) = quota.interval_wait(self.clock.now(), self.config.min_request_interval)
        {
            self.clock.sleep(wait).await;
        }

        quota.note_request(self.clock.now());
    }

    /// Throttled send: one request, quota update, no decoding.
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        accept: &'static str,
    ) -> Result<RawResponse> {
        self.throttle().await;

        let body = match payload {
            Some(payload) => Some(serde_json::to_vec(payload)?),
            None => None,
        };
        let request = TransportRequest {
            method,
            url: self.url_for(path)?,
            headers: self.build_headers(accept, body.is_some())?,
            body,
        };

        tracing::debug!(%method, %path, "sending request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(%method, %path, status = response.status, "received response");

        let snapshot = QuotaSnapshot::from_headers(&response.headers);
        {
            let mut quota = self.quota.lock().await;
            quota.apply(&snapshot);
            if response.status == 429 {
                // A header-declared reset is authoritative; the fixed
                // backoff covers only a 429 the headers left undescribed.
                if snapshot.reset_at.is_some() {
                    quota.mark_exhausted();
                } else {
                    quota.force_exhausted(self.clock.now(), RATE_LIMIT_BACKOFF);
                }
            }
        }

        Ok(response)
    }

    fn notify(&self, method: Method, path: &str, status: u16, body: Option<&Value>) {
        for observer in &self.observers {
            observer.on_response(method, path, status, body);
        }
    }

    /// Error bodies are decoded leniently; the API serves HTML for
    /// some gateway failures and that must still surface as
    /// `Error::Http`, not as a decode failure.
    fn http_error(&self, method: Method, path: &str, response: RawResponse) -> Error {
        let body = serde_json::from_slice(&response.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&response.body).into_owned()));
        self.notify(method, path, response.status, Some(&body));
        Error::from_status(response.status, path, body)
    }

    async fn request_json(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ResponseEnvelope> {
        let response = self.send(method, path, payload, "application/json").await?;

        if response.status >= 400 {
            return Err(self.http_error(method, path, response));
        }

        match ResponseEnvelope::parse(response.status, &response.headers, &response.body) {
            Ok(envelope) => {
                self.notify(method, path, envelope.status, Some(&envelope.body));
                Ok(envelope)
            }
            Err(err) => {
                self.notify(method, path, response.status, None);
                Err(err)
            }
        }
    }

    /// Issue a GET expecting a JSON body.
    pub(crate) async fn get_json(&self, path: &str) -> Result<ResponseEnvelope> {
        self.request_json(Method::Get, path, None).await
    }

    /// Issue a PUT with a JSON payload, expecting a JSON body.
    pub(crate) async fn put_json(&self, path: &str, payload: &Value) -> Result<ResponseEnvelope> {
        self.request_json(Method::Put, path, Some(payload)).await
    }

    /// Issue a GET expecting a binary body (PDF retrieval).
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::Get, path, None, "application/pdf").await?;

        if response.status >= 400 {
            return Err(self.http_error(Method::Get, path, response));
        }

        self.notify(Method::Get, path, response.status, None);
        Ok(response.body)
    }
}

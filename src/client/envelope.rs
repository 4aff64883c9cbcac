//! Response envelope parsing.
//!
//! Decodes a raw HTTP response into a structured envelope: status,
//! quota headers, JSON body. A body that is not valid JSON is an API
//! contract violation and fails loudly rather than decaying to an
//! empty envelope.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::{Error, Result};

/// Remaining-calls quota header.
pub const HEADER_QUOTA_REMAINING: &str = "X-RateLimit-Remaining";
/// Quota reset timestamp header (epoch seconds).
pub const HEADER_QUOTA_RESET: &str = "X-RateLimit-Reset";
/// Quota ceiling header.
pub const HEADER_QUOTA_LIMIT: &str = "X-RateLimit-Limit";

/// The quota values a single response declared, if any.
///
/// Absent or unparsable headers become `None`; they are not an error,
/// and the client leaves its quota state untouched for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaSnapshot {
    /// Calls remaining in the current quota window.
    pub remaining: Option<u64>,
    /// When the quota window resets.
    pub reset_at: Option<DateTime<Utc>>,
    /// Total calls allowed per window.
    pub limit: Option<u64>,
}

impl QuotaSnapshot {
    /// Extract the quota headers from a response. Header-name lookup
    /// is case-insensitive per `HeaderMap` semantics.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
        };

        Self {
            remaining: number(HEADER_QUOTA_REMAINING),
            reset_at: number(HEADER_QUOTA_RESET)
                .and_then(|epoch| Utc.timestamp_opt(epoch as i64, 0).single()),
            limit: number(HEADER_QUOTA_LIMIT),
        }
    }

    /// True when no quota header was present at all.
    pub fn is_empty(&self) -> bool {
        self.remaining.is_none() && self.reset_at.is_none() && self.limit.is_none()
    }
}

/// A decoded API response: status, declared quota, JSON body.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Quota values declared by this response's headers.
    pub quota: QuotaSnapshot,
    /// Decoded JSON body.
    pub body: Value,
}

impl ResponseEnvelope {
    /// Decode a raw success response.
    ///
    /// Fails with [`Error::MalformedResponse`] (raw body preserved for
    /// diagnostics) when the body is not valid JSON.
    pub fn parse(status: u16, headers: &HeaderMap, body: &[u8]) -> Result<Self> {
        let decoded = serde_json::from_slice(body).map_err(|err| Error::MalformedResponse {
            message: format!("body is not valid JSON: {err}"),
            raw: String::from_utf8_lossy(body).into_owned(),
        })?;

        Ok(Self {
            status,
            quota: QuotaSnapshot::from_headers(headers),
            body: decoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(entries: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_parse_extracts_quota_headers() {
        let headers = headers(&[
            ("x-ratelimit-remaining", "41"),
            ("x-ratelimit-reset", "1700000000"),
            ("x-ratelimit-limit", "20000"),
        ]);

        let envelope = ResponseEnvelope::parse(200, &headers, b"{\"ok\":true}").unwrap();
        assert_eq!(envelope.quota.remaining, Some(41));
        assert_eq!(envelope.quota.limit, Some(20000));
        assert_eq!(
            envelope.quota.reset_at.unwrap().timestamp(),
            1_700_000_000
        );
        assert_eq!(envelope.body["ok"], true);
    }

    #[test]
    fn test_missing_headers_are_none_not_error() {
        let envelope = ResponseEnvelope::parse(200, &HeaderMap::new(), b"{}").unwrap();
        assert!(envelope.quota.is_empty());
    }

    #[test]
    fn test_unparsable_header_treated_as_missing() {
        let headers = headers(&[("x-ratelimit-remaining", "soon")]);
        let snapshot = QuotaSnapshot::from_headers(&headers);
        assert_eq!(snapshot.remaining, None);
    }

    #[test]
    fn test_malformed_body_carries_raw_text() {
        let err = ResponseEnvelope::parse(200, &HeaderMap::new(), b"<html>oops</html>")
            .unwrap_err();
        match err {
            Error::MalformedResponse { raw, .. } => assert!(raw.contains("<html>")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }
}

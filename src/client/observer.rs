//! Response observers: the access log and the last-query dump.
//!
//! The client notifies each registered [`ResponseObserver`] after every
//! response. The built-in observers reproduce the two diagnostic
//! artifacts downstream tooling expects: a daily access log and a
//! single overwritten dump of the most recent JSON body. Observer I/O
//! failures are logged and swallowed; a diagnostic artifact must never
//! fail the request it describes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;

use super::transport::Method;

/// Notified after every response the client receives.
///
/// `body` is the decoded JSON body when one was available; binary
/// responses and undecodable bodies pass `None`.
pub trait ResponseObserver: Send + Sync {
    /// Observe one completed request/response exchange.
    fn on_response(&self, method: Method, path: &str, status: u16, body: Option<&Value>);
}

/// Default file name for the last-query dump artifact.
pub const DEFAULT_DUMP_FILE: &str = "dump.json";

/// Writes the most recent JSON response body to a fixed file,
/// overwriting the previous one. At most one body is retained; this is
/// a debugging aid, not an archive.
pub struct JsonDumpSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonDumpSink {
    /// Dump to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl Default for JsonDumpSink {
    fn default() -> Self {
        Self::new(DEFAULT_DUMP_FILE)
    }
}

impl ResponseObserver for JsonDumpSink {
    fn on_response(&self, _method: Method, path: &str, _status: u16, body: Option<&Value>) {
        let Some(body) = body else { return };
        let pretty = match serde_json::to_string_pretty(body) {
            Ok(pretty) => pretty,
            Err(err) => {
                tracing::warn!(%path, %err, "could not serialize dump body");
                return;
            }
        };

        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = fs::write(&self.path, pretty) {
            tracing::warn!(path = %self.path.display(), %err, "could not write dump file");
        }
    }
}

/// Appends one line per request to a daily access log:
/// `<timestamp> <method> <path> <status>`, one file per calendar day
/// under a logs directory created on first write.
pub struct AccessLog {
    dir: PathBuf,
    prefix: String,
    lock: Mutex<()>,
}

impl AccessLog {
    /// Log under the given directory with the default `scidirect`
    /// file-name prefix.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "scidirect".to_string(),
            lock: Mutex::new(()),
        }
    }

    /// Override the file-name prefix (`<prefix>-YYYYMMDD.log`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn file_for_today(&self) -> PathBuf {
        let day = Utc::now().format("%Y%m%d");
        self.dir.join(format!("{}-{}.log", self.prefix, day))
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_for_today())?;
        writeln!(file, "{line}")
    }

    /// The directory the log files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResponseObserver for AccessLog {
    fn on_response(&self, method: Method, path: &str, status: u16, _body: Option<&Value>) {
        let timestamp = Utc::now().to_rfc3339();
        let line = format!("{timestamp} {method} {path} {status}");

        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = self.append(&line) {
            tracing::warn!(dir = %self.dir.display(), %err, "could not append access log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let sink = JsonDumpSink::new(&path);

        sink.on_response(
            Method::Put,
            "/search",
            200,
            Some(&serde_json::json!({"page": 1})),
        );
        sink.on_response(
            Method::Put,
            "/search",
            200,
            Some(&serde_json::json!({"page": 2})),
        );

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"page\": 2"));
        assert!(!contents.contains("\"page\": 1"));
    }

    #[test]
    fn test_dump_sink_skips_binary_responses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let sink = JsonDumpSink::new(&path);

        sink.on_response(Method::Get, "/pdf", 200, None);
        assert!(!path.exists());
    }

    #[test]
    fn test_access_log_appends_daily_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = AccessLog::new(dir.path());

        log.on_response(Method::Get, "/content/article/pii/S1", 200, None);
        log.on_response(Method::Put, "/content/search/sciencedirect", 429, None);

        let file = log.file_for_today();
        let contents = fs::read_to_string(file).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("GET /content/article/pii/S1 200"));
        assert!(lines[1].contains("PUT /content/search/sciencedirect 429"));
    }
}

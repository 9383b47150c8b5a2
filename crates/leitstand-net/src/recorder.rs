//! Flight-recorder collaborator client.
//!
//! After every dispatch the driver hands the outcome to the recorder,
//! which POSTs it to an external audit endpoint and/or appends it as one
//! JSON line to a local append-only log. Recording failures are logged
//! and never surface to the user; the audit trail is best-effort.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use leitstand_types::WallTime;

use crate::http;

/// Request timeout for the audit endpoint.
const RECORDER_TIMEOUT: Duration = Duration::from_secs(5);

/// One audit entry.
#[derive(Debug, Clone, Serialize)]
pub struct FlightRecord {
    /// ISO 8601 UTC timestamp.
    pub timestamp: String,
    /// The raw command line as submitted.
    pub command: String,
    /// Policy verdict string recorded with the entry.
    pub policy_status: String,
    /// The outcome's result text.
    pub result: String,
    /// Free-form metadata (source, status, ...).
    pub metadata: serde_json::Value,
}

impl FlightRecord {
    /// Build an entry stamped with the current UTC time.
    pub fn now(
        command: impl Into<String>,
        policy_status: impl Into<String>,
        result: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: WallTime::now_utc().iso8601(),
            command: command.into(),
            policy_status: policy_status.into(),
            result: result.into(),
            metadata,
        }
    }
}

/// Client for the external flight-recorder endpoint and local log.
#[derive(Debug, Clone)]
pub struct FlightRecorder {
    url: Option<String>,
    log_file: Option<PathBuf>,
}

impl FlightRecorder {
    /// A recorder posting to `url` and/or appending to `log_file`.
    /// Both `None` disables recording entirely.
    pub fn new(url: Option<String>, log_file: Option<PathBuf>) -> Self {
        Self { url, log_file }
    }

    /// Whether any audit sink is configured.
    pub fn is_configured(&self) -> bool {
        self.url.is_some() || self.log_file.is_some()
    }

    /// Record one entry to every configured sink. Best-effort.
    pub fn record(&self, entry: &FlightRecord) {
        if let Some(url) = &self.url {
            match serde_json::to_value(entry) {
                Ok(payload) => match http::http_post_json(url, &payload, RECORDER_TIMEOUT) {
                    Ok(resp) if resp.status_code == 200 => {},
                    Ok(resp) => {
                        log::warn!("flight recorder returned HTTP {}", resp.status_code);
                    },
                    Err(e) => log::warn!("flight recorder unreachable: {e}"),
                },
                Err(e) => log::warn!("flight record serialization failed: {e}"),
            }
        }

        if let Some(path) = &self.log_file {
            if let Err(e) = self.append_local(entry, path) {
                log::warn!("flight recorder local log append failed: {e}");
            }
        }
    }

    /// Append one JSON line to the local audit log.
    fn append_local(&self, entry: &FlightRecord, path: &PathBuf) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn record_shape_serializes() {
        let entry = FlightRecord {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            command: "Zeit".to_string(),
            policy_status: "approved".to_string(),
            result: "current time: ...".to_string(),
            metadata: serde_json::json!({"source": "interactive"}),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], "2026-01-01T00:00:00Z");
        assert_eq!(json["command"], "Zeit");
        assert_eq!(json["policy_status"], "approved");
        assert_eq!(json["metadata"]["source"], "interactive");
    }

    #[test]
    fn now_stamps_iso8601() {
        let entry = FlightRecord::now("Zeit", "skipped", "ok", serde_json::json!({}));
        assert!(entry.timestamp.ends_with('Z'));
        assert!(entry.timestamp.contains('T'));
    }

    #[test]
    fn unconfigured_recorder_is_a_no_op() {
        let rec = FlightRecorder::new(None, None);
        assert!(!rec.is_configured());
        // Must not panic or block.
        rec.record(&FlightRecord::now("Zeit", "skipped", "ok", serde_json::json!({})));
    }

    #[test]
    fn local_log_appends_one_json_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("flight.log");
        let rec = FlightRecorder::new(None, Some(path.clone()));
        assert!(rec.is_configured());

        rec.record(&FlightRecord::now("Zeit", "skipped", "t1", serde_json::json!({})));
        rec.record(&FlightRecord::now("Analyse:x", "approved", "t2", serde_json::json!({})));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["command"], "Zeit");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["policy_status"], "approved");
    }

    #[test]
    fn remote_sink_receives_post() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            let req = String::from_utf8_lossy(&buf[..n]).into_owned();
            let resp = "HTTP/1.1 200 OK\r\nContent-Length: 21\r\n\r\n{\"status\":\"recorded\"}";
            use std::io::Write as _;
            let _ = stream.write_all(resp.as_bytes());
            req
        });

        let rec = FlightRecorder::new(
            Some(format!("http://127.0.0.1:{port}/flight_record")),
            None,
        );
        rec.record(&FlightRecord::now("Zeit", "approved", "ok", serde_json::json!({})));

        let req = handle.join().unwrap();
        assert!(req.starts_with("POST /flight_record"));
        assert!(req.contains(r#""command":"Zeit""#));
    }

    #[test]
    fn unreachable_remote_sink_does_not_fail() {
        let rec = FlightRecorder::new(Some("http://127.0.0.1:1/x".to_string()), None);
        // Logged, not surfaced.
        rec.record(&FlightRecord::now("Zeit", "approved", "ok", serde_json::json!({})));
    }
}

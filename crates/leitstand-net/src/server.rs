//! HTTP driver: exposes the shell over a network endpoint.
//!
//! `POST /` accepts `{"command": "..."}` and returns the outcome as
//! JSON; `GET /health` reports liveness. One thread per connection; the
//! command service is injected at startup and shared via `Arc`, so no
//! process-global state is involved.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use leitstand_types::{LeitstandError, Outcome, Result};

/// Maximum request size (head + body).
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Per-connection read timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn one raw command line into an outcome.
///
/// Implemented by the session driver so the HTTP endpoint and the
/// interactive loop share the exact same pipeline.
pub trait CommandService: Send + Sync {
    fn submit(&self, raw: &str) -> Outcome;
}

/// The HTTP driver, bound to a local port.
pub struct HttpDriver {
    listener: TcpListener,
}

impl HttpDriver {
    /// Bind to `127.0.0.1:port` (port 0 picks an ephemeral port).
    pub fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .map_err(|e| LeitstandError::Net(format!("bind port {port}: {e}")))?;
        Ok(Self { listener })
    }

    /// The bound address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| LeitstandError::Net(format!("local addr: {e}")))
    }

    /// Accept connections forever, one thread per connection.
    pub fn run(&self, service: Arc<dyn CommandService>) {
        for conn in self.listener.incoming() {
            match conn {
                Ok(stream) => {
                    let service = Arc::clone(&service);
                    std::thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, service.as_ref()) {
                            log::debug!("connection error: {e}");
                        }
                    });
                },
                Err(e) => log::warn!("accept error: {e}"),
            }
        }
    }
}

/// Read one request, route it, write one response.
fn handle_connection(mut stream: TcpStream, service: &dyn CommandService) -> Result<()> {
    stream
        .set_read_timeout(Some(REQUEST_TIMEOUT))
        .map_err(|e| LeitstandError::Net(format!("set read timeout: {e}")))?;

    let request = read_request(&mut stream)?;
    let (method, path) = parse_request_line(&request.head)?;

    match (method.as_str(), path.as_str()) {
        ("POST", "/") => {
            let outcome = match parse_command_body(&request.body) {
                Ok(raw) => service.submit(&raw),
                Err(msg) => {
                    let outcome = Outcome::error(msg);
                    write_json(&mut stream, 400, "Bad Request", &outcome)?;
                    return Ok(());
                },
            };
            write_json(&mut stream, 200, "OK", &outcome)?;
        },
        ("GET", "/health") => {
            let body = serde_json::json!({"status": "healthy", "service": "leitstand"});
            write_json(&mut stream, 200, "OK", &body)?;
        },
        _ => {
            let outcome = Outcome::error(format!("no route for {method} {path}"));
            write_json(&mut stream, 404, "Not Found", &outcome)?;
        },
    }
    Ok(())
}

/// A raw request split at the header/body boundary.
struct RawRequest {
    head: String,
    body: Vec<u8>,
}

/// Read the request head and, if Content-Length says so, the body.
fn read_request(stream: &mut TcpStream) -> Result<RawRequest> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 2048];

    let header_end = loop {
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos;
        }
        if buf.len() > MAX_REQUEST_BYTES {
            return Err(LeitstandError::Net("request too large".to_string()));
        }
        let n = stream
            .read(&mut chunk)
            .map_err(|e| LeitstandError::Net(format!("read request: {e}")))?;
        if n == 0 {
            return Err(LeitstandError::Net("connection closed mid-request".to_string()));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let body_start = header_end + 4;

    let content_length = head
        .lines()
        .skip(1)
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    if content_length > MAX_REQUEST_BYTES {
        return Err(LeitstandError::Net("request body too large".to_string()));
    }

    let mut body = buf[body_start..].to_vec();
    while body.len() < content_length {
        let n = stream
            .read(&mut chunk)
            .map_err(|e| LeitstandError::Net(format!("read body: {e}")))?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(RawRequest { head, body })
}

/// Parse `"METHOD /path HTTP/1.1"` from the head.
fn parse_request_line(head: &str) -> Result<(String, String)> {
    let line = head
        .lines()
        .next()
        .ok_or_else(|| LeitstandError::Net("empty request".to_string()))?;
    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| LeitstandError::Net(format!("bad request line: {line}")))?;
    let path = parts
        .next()
        .ok_or_else(|| LeitstandError::Net(format!("bad request line: {line}")))?;
    // Ignore any query string on the path for routing.
    let path = path.split('?').next().unwrap_or(path);
    Ok((method.to_string(), path.to_string()))
}

/// Extract the `command` field from a dispatch request body.
fn parse_command_body(body: &[u8]) -> std::result::Result<String, String> {
    let json: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| "invalid JSON body".to_string())?;
    match json.get("command").and_then(|v| v.as_str()) {
        Some(raw) => Ok(raw.to_string()),
        None => Err("missing 'command' field".to_string()),
    }
}

/// Write a JSON response with the given status.
fn write_json(
    stream: &mut TcpStream,
    status: u16,
    reason: &str,
    body: &impl serde::Serialize,
) -> Result<()> {
    let body = serde_json::to_vec(body)?;
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len(),
    );
    stream
        .write_all(head.as_bytes())
        .and_then(|()| stream.write_all(&body))
        .map_err(|e| LeitstandError::Net(format!("write response: {e}")))?;
    Ok(())
}

/// Find the position of a byte subsequence in a slice.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

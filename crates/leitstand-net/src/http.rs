//! Minimal HTTP/1.1 client over `std::net::TcpStream`.
//!
//! Plain HTTP only; all collaborator endpoints and the weather API speak
//! HTTP on the loopback or an unencrypted public endpoint. HTTPS URLs
//! produce a clear error instead of a silent fallback.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use leitstand_types::{LeitstandError, Result};

use crate::url::Url;

/// Maximum response body size (1 MB; responses here are small JSON).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A raw parsed HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404).
    pub status_code: u16,
    /// Response headers as (lowercased name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body as UTF-8 text (lossy).
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn body_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Perform an HTTP GET request with the given read timeout.
pub fn http_get(url: &str, timeout: Duration) -> Result<HttpResponse> {
    let url = parse_http_url(url)?;
    request(&url, "GET", None, timeout)
}

/// POST a JSON payload and return the parsed response.
pub fn http_post_json(
    url: &str,
    payload: &serde_json::Value,
    timeout: Duration,
) -> Result<HttpResponse> {
    let url = parse_http_url(url)?;
    let body = serde_json::to_vec(payload)?;
    request(&url, "POST", Some(&body), timeout)
}

/// Parse and validate a URL for the plain-HTTP client.
fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)?;
    match parsed.scheme.as_str() {
        "http" => Ok(parsed),
        "https" => Err(LeitstandError::Net(
            "HTTPS is not supported; use a plain HTTP endpoint".to_string(),
        )),
        other => Err(LeitstandError::Net(format!(
            "unsupported scheme for HTTP client: {other}"
        ))),
    }
}

/// Connect, send one request, read and parse the response.
fn request(
    url: &Url,
    method: &str,
    body: Option<&[u8]>,
    timeout: Duration,
) -> Result<HttpResponse> {
    let mut stream = tcp_connect(&url.host, url.effective_port(), timeout)?;
    send_request(&mut stream, url, method, body)?;
    let raw = read_response(&mut stream)?;
    parse_response(&raw)
}

/// Open a TCP connection with connect and read timeouts.
fn tcp_connect(host: &str, port: u16, read_timeout: Duration) -> Result<TcpStream> {
    use std::net::ToSocketAddrs;

    let addr = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|e| LeitstandError::Net(format!("DNS resolution failed: {e}")))?
        .next()
        .ok_or_else(|| LeitstandError::Net(format!("no addresses for {host}:{port}")))?;

    let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT.min(read_timeout))
        .map_err(|e| LeitstandError::Net(format!("TCP connect failed: {e}")))?;

    stream
        .set_read_timeout(Some(read_timeout))
        .map_err(|e| LeitstandError::Net(format!("set read timeout: {e}")))?;

    Ok(stream)
}

/// Send an HTTP/1.1 request, with a JSON body for POST.
fn send_request(
    stream: &mut impl Write,
    url: &Url,
    method: &str,
    body: Option<&[u8]>,
) -> Result<()> {
    let mut request = format!(
        "{method} {} HTTP/1.1\r\n\
         Host: {}\r\n\
         User-Agent: leitstand/0.1\r\n\
         Accept: */*\r\n\
         Connection: close\r\n",
        url.request_target(),
        url.host_header(),
    );
    if let Some(body) = body {
        request.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            body.len(),
        ));
    }
    request.push_str("\r\n");

    stream
        .write_all(request.as_bytes())
        .map_err(|e| LeitstandError::Net(format!("send request: {e}")))?;
    if let Some(body) = body {
        stream
            .write_all(body)
            .map_err(|e| LeitstandError::Net(format!("send body: {e}")))?;
    }
    Ok(())
}

/// Read the entire response until EOF or until the read timeout fires.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE + 4096 {
                    return Err(LeitstandError::Net("response too large".to_string()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                return Err(LeitstandError::Net("request timed out".to_string()));
            },
            Err(e) => {
                return Err(LeitstandError::Net(format!("read response: {e}")));
            },
        }
    }
    Ok(buf)
}

/// Parse raw bytes into status code, headers, and body.
pub fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subsequence(data, b"\r\n\r\n").ok_or_else(|| {
        LeitstandError::Net("malformed HTTP response: no header terminator".to_string())
    })?;

    let header_bytes = &data[..header_end];
    let body_start = header_end + 4;

    let header_str = std::str::from_utf8(header_bytes)
        .map_err(|_| LeitstandError::Net("non-UTF-8 headers".to_string()))?;

    let mut lines = header_str.split("\r\n");

    // Status line: "HTTP/1.x STATUS REASON"
    let status_line = lines
        .next()
        .ok_or_else(|| LeitstandError::Net("empty response".to_string()))?;
    let status_code = parse_status_line(status_line)?;

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    let raw_body = &data[body_start..];
    let body = if find_header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked"))
    {
        decode_chunked(raw_body)?
    } else if let Some(cl) = find_header(&headers, "content-length") {
        let len: usize = cl
            .parse()
            .map_err(|_| LeitstandError::Net("bad Content-Length".to_string()))?;
        if len > MAX_BODY_SIZE {
            return Err(LeitstandError::Net("response body too large".to_string()));
        }
        raw_body[..raw_body.len().min(len)].to_vec()
    } else {
        raw_body.to_vec()
    };

    if body.len() > MAX_BODY_SIZE {
        return Err(LeitstandError::Net("response body too large".to_string()));
    }

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

/// Parse the HTTP status code from the status line.
fn parse_status_line(line: &str) -> Result<u16> {
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    if parts.len() < 2 {
        return Err(LeitstandError::Net(format!("bad status line: {line}")));
    }
    parts[1]
        .parse()
        .map_err(|_| LeitstandError::Net(format!("bad status code in: {line}")))
}

/// Case-insensitive header lookup.
pub fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();
    headers
        .iter()
        .find(|(k, _)| k == &name_lower)
        .map(|(_, v)| v.as_str())
}

/// Decode a chunked transfer-encoded body.
fn decode_chunked(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut pos = 0;

    while let Some(i) = find_subsequence(&data[pos..], b"\r\n") {
        let line_end = pos + i;

        let size_str = std::str::from_utf8(&data[pos..line_end])
            .map_err(|_| LeitstandError::Net("bad chunk size".to_string()))?
            .trim();
        // Strip optional chunk extensions (after `;`).
        let size_str = size_str.split(';').next().unwrap_or("").trim();

        let chunk_size = usize::from_str_radix(size_str, 16)
            .map_err(|_| LeitstandError::Net("bad chunk size".to_string()))?;

        if chunk_size == 0 {
            break;
        }

        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + chunk_size;

        if chunk_end > data.len() {
            // Partial chunk -- take what we have.
            result.extend_from_slice(&data[chunk_start..]);
            break;
        }

        if result.len() + chunk_size > MAX_BODY_SIZE {
            return Err(LeitstandError::Net("chunked body too large".to_string()));
        }

        result.extend_from_slice(&data[chunk_start..chunk_end]);
        pos = chunk_end + 2;
    }

    Ok(result)
}

/// Find the position of a byte subsequence in a slice.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

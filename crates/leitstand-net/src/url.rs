//! URL parsing (simplified RFC 3986).
//!
//! Only what the HTTP client needs: scheme, host, optional port, path,
//! and query. Fragments are stripped; userinfo is not supported.

use leitstand_types::{LeitstandError, Result};

/// A parsed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Scheme component, lowercased (e.g. `"http"`).
    pub scheme: String,
    /// Host component (e.g. `"example.com"`).
    pub host: String,
    /// Optional explicit port number.
    pub port: Option<u16>,
    /// Path component starting with `/`.
    pub path: String,
    /// Optional query string (without the leading `?`).
    pub query: Option<String>,
}

impl Url {
    /// Parse an absolute URL string.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let idx = url
            .find("://")
            .ok_or_else(|| LeitstandError::Net(format!("not an absolute URL: {url}")))?;
        let scheme = url[..idx].to_lowercase();
        let rest = &url[idx + 3..];

        // Strip fragment.
        let rest = match rest.find('#') {
            Some(i) => &rest[..i],
            None => rest,
        };

        // Split off query.
        let (rest, query) = match rest.find('?') {
            Some(i) => (&rest[..i], Some(rest[i + 1..].to_string())),
            None => (rest, None),
        };

        // Split authority from path.
        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };

        // Parse host and optional port.
        let (host, port) = match authority.rfind(':') {
            Some(i) => {
                let p: u16 = authority[i + 1..]
                    .parse()
                    .map_err(|_| LeitstandError::Net(format!("bad port in URL: {url}")))?;
                (&authority[..i], Some(p))
            },
            None => (authority, None),
        };

        if host.is_empty() {
            return Err(LeitstandError::Net(format!("URL has no host: {url}")));
        }

        Ok(Url {
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
            query,
        })
    }

    /// The effective port (explicit or scheme default).
    pub fn effective_port(&self) -> u16 {
        self.port
            .unwrap_or(if self.scheme == "https" { 443 } else { 80 })
    }

    /// Value for the `Host:` header (port included only when non-default).
    pub fn host_header(&self) -> String {
        match self.port {
            Some(p) if p != if self.scheme == "https" { 443 } else { 80 } => {
                format!("{}:{}", self.host, p)
            },
            _ => self.host.clone(),
        }
    }

    /// Path plus query, as sent on the request line.
    pub fn request_target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_http() {
        let u = Url::parse("http://example.com/path/to/thing").unwrap();
        assert_eq!(u.scheme, "http");
        assert_eq!(u.host, "example.com");
        assert_eq!(u.port, None);
        assert_eq!(u.path, "/path/to/thing");
        assert!(u.query.is_none());
        assert_eq!(u.effective_port(), 80);
    }

    #[test]
    fn parse_with_port_and_query() {
        let u = Url::parse("http://127.0.0.1:8080/policy_check?x=1&y=2").unwrap();
        assert_eq!(u.host, "127.0.0.1");
        assert_eq!(u.port, Some(8080));
        assert_eq!(u.path, "/policy_check");
        assert_eq!(u.query.as_deref(), Some("x=1&y=2"));
        assert_eq!(u.host_header(), "127.0.0.1:8080");
        assert_eq!(u.request_target(), "/policy_check?x=1&y=2");
    }

    #[test]
    fn parse_without_path() {
        let u = Url::parse("http://example.com").unwrap();
        assert_eq!(u.path, "/");
        assert_eq!(u.request_target(), "/");
    }

    #[test]
    fn fragment_is_stripped() {
        let u = Url::parse("http://example.com/page#section").unwrap();
        assert_eq!(u.path, "/page");
    }

    #[test]
    fn default_port_omitted_from_host_header() {
        let u = Url::parse("http://example.com:80/x").unwrap();
        assert_eq!(u.host_header(), "example.com");
    }

    #[test]
    fn relative_url_rejected() {
        assert!(Url::parse("/just/a/path").is_err());
        assert!(Url::parse("example.com/x").is_err());
    }

    #[test]
    fn bad_port_rejected() {
        assert!(Url::parse("http://example.com:notaport/").is_err());
    }

    #[test]
    fn scheme_is_lowercased() {
        let u = Url::parse("HTTP://Example.com/").unwrap();
        assert_eq!(u.scheme, "http");
        // Host case is preserved; matching is the resolver's concern.
        assert_eq!(u.host, "Example.com");
    }
}

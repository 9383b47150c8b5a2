//! Network commands: reachability check and weather lookup.
//!
//! Network failures never abort a dispatch; they come back as error
//! outcomes with the cause in the message.

use std::time::Duration;

use leitstand_net::http;
use leitstand_types::{Config, Outcome, Result};

use crate::command::Command;

/// Timeout for command-initiated requests.
const NET_TIMEOUT: Duration = Duration::from_secs(5);

/// Default OpenWeatherMap endpoint.
const WEATHER_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

// ---------------------------------------------------------------------------
// Netzwerk
// ---------------------------------------------------------------------------

/// Checks whether a URL is reachable.
pub struct NetzwerkCommand;

impl NetzwerkCommand {
    pub fn build(_config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self))
    }
}

impl Command for NetzwerkCommand {
    fn name(&self) -> &str {
        "Netzwerk"
    }

    fn description(&self) -> &str {
        "checks whether a URL is reachable. Usage: Netzwerk:http://example.com"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        let url = value.trim();
        if url.is_empty() {
            return Ok(Outcome::error("URL required"));
        }
        match http::http_get(url, NET_TIMEOUT) {
            Ok(resp) => Ok(Outcome::success(format!(
                "response from {url}: status {}",
                resp.status_code,
            ))),
            Err(e) => Ok(Outcome::error(format!("network error: {e}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Wetter
// ---------------------------------------------------------------------------

/// Fetches the current weather for a city from OpenWeatherMap.
pub struct WetterCommand {
    api_key: Option<String>,
    endpoint: String,
}

impl WetterCommand {
    pub fn build(config: &Config) -> Result<Box<dyn Command>> {
        Ok(Box::new(Self {
            api_key: config.openweathermap_key().map(str::to_string),
            endpoint: WEATHER_ENDPOINT.to_string(),
        }))
    }

    #[cfg(test)]
    fn with_endpoint(api_key: Option<&str>, endpoint: &str) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
            endpoint: endpoint.to_string(),
        }
    }
}

impl Command for WetterCommand {
    fn name(&self) -> &str {
        "Wetter"
    }

    fn description(&self) -> &str {
        "shows the current weather for a city. Usage: Wetter:Berlin"
    }

    fn execute(&self, value: &str) -> Result<Outcome> {
        let city = value.trim();
        if city.is_empty() {
            return Ok(Outcome::error("city required"));
        }
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Outcome::error("OpenWeatherMap API key not configured"));
        };

        let url = format!(
            "{}?q={}&appid={key}&units=metric&lang=de",
            self.endpoint,
            escape_query(city),
        );
        let resp = match http::http_get(&url, NET_TIMEOUT) {
            Ok(resp) => resp,
            Err(e) => return Ok(Outcome::error(format!("network error: {e}"))),
        };

        let json = match resp.body_json() {
            Ok(json) => json,
            Err(e) => return Ok(Outcome::error(format!("weather service error: {e}"))),
        };

        if resp.status_code != 200 {
            let message = json["message"].as_str().unwrap_or("unknown error");
            return Ok(Outcome::error(format!("weather lookup failed: {message}")));
        }

        let description = json["weather"][0]["description"].as_str().unwrap_or("unknown");
        let Some(temp) = json["main"]["temp"].as_f64() else {
            return Ok(Outcome::error("weather service error: temperature missing"));
        };

        Ok(Outcome::success(format!(
            "weather in {}: {description}, temperature: {temp:.1}°C",
            crate::registry::capitalize(city),
        )))
    }
}

/// Minimal query escaping; city names may contain spaces.
fn escape_query(s: &str) -> String {
    s.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Answer one HTTP request with the given body, return the request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, std::thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            let req = String::from_utf8_lossy(&buf[..n]).into_owned();
            let resp = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len(),
            );
            let _ = stream.write_all(resp.as_bytes());
            req
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn netzwerk_requires_a_url() {
        let outcome = NetzwerkCommand.execute("  ").unwrap();
        assert_eq!(outcome, Outcome::error("URL required"));
    }

    #[test]
    fn netzwerk_reports_the_status_code() {
        let (base, handle) = serve_once("200 OK", "{}");
        let outcome = NetzwerkCommand.execute(&base).unwrap();
        handle.join().unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.result, format!("response from {base}: status 200"));
    }

    #[test]
    fn netzwerk_unreachable_host_is_an_error_outcome() {
        let outcome = NetzwerkCommand.execute("http://127.0.0.1:1/").unwrap();
        assert!(!outcome.is_success());
        assert!(outcome.result.starts_with("network error:"));
    }

    #[test]
    fn wetter_requires_a_city() {
        let cmd = WetterCommand::with_endpoint(Some("k"), "http://127.0.0.1:1/w");
        let outcome = cmd.execute("").unwrap();
        assert_eq!(outcome, Outcome::error("city required"));
    }

    #[test]
    fn wetter_without_api_key_is_an_error_outcome() {
        let cmd = WetterCommand::with_endpoint(None, "http://127.0.0.1:1/w");
        let outcome = cmd.execute("Berlin").unwrap();
        assert_eq!(outcome, Outcome::error("OpenWeatherMap API key not configured"));
    }

    #[test]
    fn wetter_formats_a_successful_lookup() {
        let (base, handle) = serve_once(
            "200 OK",
            r#"{"weather":[{"description":"leichter Regen"}],"main":{"temp":12.34}}"#,
        );
        let cmd = WetterCommand::with_endpoint(Some("testkey"), &base);
        let outcome = cmd.execute("berlin").unwrap();
        let req = handle.join().unwrap();

        assert!(outcome.is_success(), "{}", outcome.result);
        assert_eq!(
            outcome.result,
            "weather in Berlin: leichter Regen, temperature: 12.3°C",
        );
        assert!(req.contains("q=berlin"));
        assert!(req.contains("appid=testkey"));
        assert!(req.contains("units=metric"));
    }

    #[test]
    fn wetter_escapes_spaces_in_the_city() {
        let (base, handle) = serve_once(
            "200 OK",
            r#"{"weather":[{"description":"klar"}],"main":{"temp":5.0}}"#,
        );
        let cmd = WetterCommand::with_endpoint(Some("k"), &base);
        let outcome = cmd.execute("Frankfurt am Main").unwrap();
        let req = handle.join().unwrap();

        assert!(outcome.is_success());
        assert!(req.contains("q=Frankfurt%20am%20Main"));
    }

    #[test]
    fn wetter_surfaces_the_service_error_message() {
        let (base, handle) = serve_once(
            "404 Not Found",
            r#"{"cod":"404","message":"city not found"}"#,
        );
        let cmd = WetterCommand::with_endpoint(Some("k"), &base);
        let outcome = cmd.execute("Nirgendwo").unwrap();
        handle.join().unwrap();

        assert_eq!(outcome, Outcome::error("weather lookup failed: city not found"));
    }

    #[test]
    fn wetter_unreachable_service_is_an_error_outcome() {
        let cmd = WetterCommand::with_endpoint(Some("k"), "http://127.0.0.1:1/w");
        let outcome = cmd.execute("Berlin").unwrap();
        assert!(!outcome.is_success());
        assert!(outcome.result.starts_with("network error:"));
    }
}

// ABOUTME: The Fetcher that issues throttled HTTP GET requests through one reused blocking client.
// ABOUTME: Returns raw responses regardless of status and decodes bodies using charset hints or detection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use encoding_rs::Encoding;

use crate::error::{Result, WebError};
use crate::options::{FetcherBuilder, FetcherOptions};
use crate::throttle::RateLimiter;

/// A fetched response. Any status code is kept as-is.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Decode the body as text, using the Content-Type charset or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }

    /// Returns true for 2xx statuses. Informational only; fetch never fails on status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Throttled HTTP client.
///
/// Holds one `reqwest::blocking::Client` for its whole lifetime and a
/// [`RateLimiter`] that spaces consecutive requests by at least the
/// requested delay.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: reqwest::blocking::Client,
    headers: HashMap<String, String>,
    delay: Duration,
    limiter: Arc<RateLimiter>,
}

impl Fetcher {
    /// Create a new FetcherBuilder for configuring a Fetcher.
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    /// Create a Fetcher from options.
    pub fn new(opts: FetcherOptions) -> Result<Self> {
        let http = match opts.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::blocking::Client::builder()
                    .user_agent(opts.user_agent.as_str())
                    .timeout(opts.timeout);
                if let Some(max) = opts.pool_max_idle_per_host {
                    builder = builder.pool_max_idle_per_host(max);
                }
                builder.build().map_err(|e| {
                    WebError::config("BuildClient", Some(anyhow::Error::new(e)))
                })?
            }
        };

        Ok(Self {
            http,
            headers: opts.headers,
            delay: opts.delay,
            limiter: opts.rate_limiter.unwrap_or_default(),
        })
    }

    /// Default delay applied by `fetch` and `fetch_text`.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The limiter shared by every request of this fetcher.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// GET `url` after waiting out the default delay.
    pub fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.fetch_with_delay(url, self.delay)
    }

    /// GET `url`, waiting until at least `delay` has passed since the
    /// previous request completed.
    pub fn fetch_with_delay(&self, url: &str, delay: Duration) -> Result<FetchResponse> {
        let parsed = validate_url(url)?;

        self.limiter.run(delay, || {
            log::trace!("GET {}", parsed);

            let mut request = self.http.get(parsed.clone());
            for (key, value) in &self.headers {
                request = request.header(key, value);
            }

            let response = request
                .send()
                .map_err(|e| WebError::from_transport(url, "Fetch", e))?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_lowercase());

            let body = response.bytes().map_err(|e| {
                if e.is_timeout() {
                    WebError::timeout(url, "ReadBody", Some(anyhow::Error::new(e)))
                } else {
                    WebError::body(url, "ReadBody", Some(anyhow::Error::new(e)))
                }
            })?;

            log::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

            Ok(FetchResponse {
                status,
                url: url.to_string(),
                final_url,
                content_type,
                body: body.to_vec(),
            })
        })
    }

    /// GET `url` with the default delay and return the decoded body.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        self.fetch(url).map(|r| r.text())
    }

    /// GET `url` with an explicit delay and return the decoded body.
    pub fn fetch_text_with_delay(&self, url: &str, delay: Duration) -> Result<String> {
        self.fetch_with_delay(url, delay).map(|r| r.text())
    }
}

fn validate_url(url: &str) -> Result<url::Url> {
    if url.is_empty() {
        return Err(WebError::invalid_url(url, "Fetch", None));
    }

    let parsed = url::Url::parse(url).map_err(|e| {
        WebError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(WebError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        )),
    }
}

/// Pick the encoding for a body: a byte-order mark wins, then the
/// Content-Type charset parameter, then chardetng's guess.
fn body_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return encoding;
    }

    let labelled = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = labelled {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    detector.guess(None, true)
}

fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = body_encoding(body, content_type);
    let (text, _, malformed) = encoding.decode(body);
    if malformed {
        log::debug!("body had bytes invalid in {}", encoding.name());
    }
    text.into_owned()
}

/// The `charset` parameter of a Content-Type value, unquoted.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_url_rejects_empty_and_relative() {
        assert!(validate_url("").unwrap_err().is_invalid_url());
        assert!(validate_url("/just/a/path").unwrap_err().is_invalid_url());
    }

    #[test]
    fn validate_url_rejects_other_schemes() {
        let err = validate_url("ftp://example.com/file").unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn validate_url_accepts_http_and_https() {
        assert!(validate_url("http://example.com/").is_ok());
        assert!(validate_url("https://example.com/a?b=c").is_ok());
    }

    #[test]
    fn invalid_url_does_not_touch_limiter() {
        let fetcher = Fetcher::builder().build().unwrap();
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(err.is_invalid_url());
        assert!(fetcher.rate_limiter().last_request().is_none());
    }

    #[test]
    fn charset_param_is_case_insensitive_and_unquoted() {
        assert_eq!(charset_param("text/html; charset=utf-8"), Some("utf-8"));
        assert_eq!(charset_param("text/html;Charset=\"Shift_JIS\""), Some("Shift_JIS"));
        assert_eq!(charset_param("text/html; boundary=x; charset='koi8-r'"), Some("koi8-r"));
        assert_eq!(charset_param("text/html"), None);
        assert_eq!(charset_param("text/html; charset="), None);
        assert_eq!(charset_param("charset=utf-8"), None);
    }

    #[test]
    fn latin1_label_decodes_high_bytes() {
        let body: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        assert_eq!(decode_body(body, Some("text/html; charset=iso-8859-1")), "caf\u{e9}");
    }

    #[test]
    fn bom_overrides_header_label() {
        let body: &[u8] = &[0xef, 0xbb, 0xbf, 0x63, 0x61, 0x66, 0xc3, 0xa9];
        assert_eq!(body_encoding(body, Some("text/html; charset=iso-8859-1")), encoding_rs::UTF_8);
        assert_eq!(decode_body(body, Some("text/html; charset=iso-8859-1")), "caf\u{e9}");
    }

    #[test]
    fn unknown_label_falls_back_to_detection() {
        let body = "plain ascii".as_bytes();
        assert_eq!(decode_body(body, Some("text/html; charset=no-such-thing")), "plain ascii");
        assert_eq!(decode_body(body, None), "plain ascii");
    }

    #[test]
    fn response_success_flag() {
        let mut resp = FetchResponse {
            status: 200,
            url: "http://example.com/".to_string(),
            final_url: "http://example.com/".to_string(),
            content_type: None,
            body: b"ok".to_vec(),
        };
        assert!(resp.is_success());
        resp.status = 404;
        assert!(!resp.is_success());
        assert_eq!(resp.text(), "ok");
    }
}

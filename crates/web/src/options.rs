// ABOUTME: Configuration options for the fetcher including FetcherOptions and FetcherBuilder.
// ABOUTME: FetcherBuilder provides a fluent API for constructing Fetcher instances with custom settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::throttle::RateLimiter;

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/67.0.3396.87 Safari/537.36";

/// Minimum delay between consecutive requests when none is given.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Configuration options for a Fetcher.
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    pub pool_max_idle_per_host: Option<usize>,
    pub delay: Duration,
    pub http_client: Option<reqwest::blocking::Client>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            timeout: None,
            pool_max_idle_per_host: None,
            delay: DEFAULT_DELAY,
            http_client: None,
            rate_limiter: None,
        }
    }
}

/// Builder for constructing Fetcher instances with custom configuration.
#[derive(Debug, Clone)]
pub struct FetcherBuilder {
    opts: FetcherOptions,
}

impl FetcherBuilder {
    /// Create a new FetcherBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: FetcherOptions::default(),
        }
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }

    /// Cap idle pooled connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.opts.pool_max_idle_per_host = Some(max);
        self
    }

    /// Set the default minimum delay between requests.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.opts.delay = delay;
        self
    }

    /// Use a custom HTTP client. User-agent, timeout and pool settings are
    /// then the caller's responsibility; extra headers are still applied.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Share a rate limiter with other fetchers.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.opts.rate_limiter = Some(limiter);
        self
    }

    /// Build the Fetcher with the configured options.
    pub fn build(self) -> Result<Fetcher> {
        Fetcher::new(self.opts)
    }
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ABOUTME: Error types for scour-web including the ErrorCode enum and WebError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Body,
    Config,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Body => "body error",
            ErrorCode::Config => "configuration error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for fetch and pipeline operations.
#[derive(Debug, thiserror::Error)]
pub struct WebError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() {
            write!(f, "scour: {}: {}", self.op, self.code)?;
        } else {
            write!(f, "scour: {} {}: {}", self.op, self.url, self.code)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl WebError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a Body error (the response arrived but its body could not be read).
    pub fn body(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Body, url, op, source)
    }

    /// Create a Config error. Used when the HTTP client cannot be built.
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Config, String::new(), op, source)
    }

    /// Classify a transport error from reqwest into Timeout or Fetch.
    pub fn from_transport(
        url: impl Into<String>,
        op: impl Into<String>,
        err: reqwest::Error,
    ) -> Self {
        if err.is_timeout() {
            Self::timeout(url, op, Some(anyhow::Error::new(err)))
        } else {
            Self::fetch(url, op, Some(anyhow::Error::new(err)))
        }
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Body error.
    pub fn is_body(&self) -> bool {
        self.code == ErrorCode::Body
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }
}

/// Result alias used throughout scour-web.
pub type Result<T> = std::result::Result<T, WebError>;

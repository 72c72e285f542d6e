// ABOUTME: Main library entry point for scour-web, a polite fetcher and HTML sanitizer.
// ABOUTME: Re-exports the public API: Fetcher, FetcherBuilder, RateLimiter, WebError, and the dom cleaners.

//! scour-web - throttled page fetching and HTML noise removal.
//!
//! A [`Fetcher`] issues GET requests through one reused blocking client and
//! spaces consecutive requests with a [`RateLimiter`]. The [`dom`] module
//! parses markup into a `scraper::Html` tree and strips scripts, styles,
//! metadata, images and comments.
//!
//! # Example
//!
//! ```no_run
//! use scour_web::{Fetcher, ParseOptions, WebError};
//!
//! fn main() -> Result<(), WebError> {
//!     let fetcher = Fetcher::builder().build()?;
//!     let doc = fetcher.fetch_and_clean("https://example.com/", &ParseOptions::default())?;
//!     println!("{}", doc.html());
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod fetch;
pub mod options;
pub mod pipeline;
pub mod throttle;

pub use crate::dom::{
    clean_document, document_text, parse_document, CleanOptions, CleanStats, ParseOptions,
    Strainer, TagFilter,
};
pub use crate::error::{ErrorCode, Result, WebError};
pub use crate::fetch::{FetchResponse, Fetcher};
pub use crate::options::{FetcherBuilder, FetcherOptions, DEFAULT_DELAY, DEFAULT_USER_AGENT};
pub use crate::throttle::RateLimiter;
pub use scraper::Html;

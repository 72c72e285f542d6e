// ABOUTME: Fetch-and-clean pipeline composing the throttled fetcher with the sanitizer.
// ABOUTME: Failures in either stage propagate unchanged.

use std::time::Duration;

use scraper::Html;

use crate::dom::{parse_document, ParseOptions};
use crate::error::Result;
use crate::fetch::Fetcher;

impl Fetcher {
    /// Fetch `url` with the default delay and parse it with `opts`.
    pub fn fetch_and_clean(&self, url: &str, opts: &ParseOptions) -> Result<Html> {
        self.fetch_and_clean_with_delay(url, self.delay(), opts)
    }

    /// Fetch `url` with an explicit delay and parse it with `opts`.
    pub fn fetch_and_clean_with_delay(
        &self,
        url: &str,
        delay: Duration,
        opts: &ParseOptions,
    ) -> Result<Html> {
        let text = self.fetch_text_with_delay(url, delay)?;
        Ok(parse_document(&text, opts))
    }
}

// ABOUTME: HTML parsing and sanitization on top of scraper's document tree.
// ABOUTME: Exposes tag filters, strainers, the cleaner and parse helpers.

//! DOM utilities for HTML document cleaning.
//!
//! Documents are `scraper::Html` trees. Parsing is lenient; cleaning
//! detaches noise elements and comment-like nodes in place.

pub mod parse;
pub mod sanitize;
pub mod strainer;
pub mod tags;

pub use parse::{document_text, elements, parse_document, ParseOptions};
pub use sanitize::{clean_document, CleanOptions, CleanStats};
pub use strainer::{AttrMatch, Strainer};
pub use tags::{TagFilter, CLEAN_TAGS, EXTRA_TAGS};

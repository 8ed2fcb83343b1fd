//! Service layer for the crawler.
//!
//! This module contains the business logic for:
//! - Content region and link rule lookup (`ContentLocator`)
//! - Local link discovery (`local_matching_paths`)
//! - Word cleaning and stop-word filtering (`TextNormalizer`)
//! - Level-by-level traversal (`CrawlEngine`)
//! - Frequency ranking (`top_n`)

mod crawler;
mod links;
mod locator;
mod report;
mod text;

pub use crawler::{CrawlEngine, CrawlOptions};
pub use links::{extract_links, local_matching_paths};
pub use locator::{ContentLocator, ContentRule};
pub use report::top_n;
pub use text::{StopWords, TextNormalizer, clean, filter_stop_words, region_text, tokenize};

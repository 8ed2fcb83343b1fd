//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl from a seed and build the word frequency report

pub mod crawl;

pub use crawl::{CrawlRun, run_crawler};

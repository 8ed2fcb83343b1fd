// src/models/mod.rs

//! Domain models for the crawler.

mod config;
mod report;
mod rule;

pub use config::{Config, CrawlerConfig, ReportConfig, TextConfig};
pub use report::{CrawlOutcome, CrawlReport, WordCount};
pub use rule::{DEFAULT_LINK_PATTERN, RuleConfig};

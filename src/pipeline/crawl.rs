// src/pipeline/crawl.rs

//! Crawl-and-report pipeline.

use std::sync::Arc;

use chrono::Utc;

use crate::config::load_components;
use crate::error::Result;
use crate::models::{Config, CrawlOutcome, CrawlReport};
use crate::services::{CrawlEngine, CrawlOptions, top_n};
use crate::storage::ReportStorage;
use crate::utils::http::PageFetcher;
use crate::utils::url::{normalize_scheme, validate};

/// Result of a pipeline run.
#[derive(Debug)]
pub struct CrawlRun {
    pub outcome: CrawlOutcome,
    pub report: CrawlReport,
    /// Where the report was stored, if a storage was given
    pub location: Option<String>,
}

/// Crawl from `input`, rank the words and optionally store the report.
///
/// `input` may omit the scheme; it is normalized and validated before any
/// page is fetched.
pub async fn run_crawler(
    config: &Config,
    input: &str,
    fetcher: Arc<dyn PageFetcher>,
    storage: Option<&dyn ReportStorage>,
) -> Result<CrawlRun> {
    let started_at = Utc::now();
    let seed = validate(&normalize_scheme(input))?;

    let (locator, normalizer) = load_components(config)?;
    let engine = CrawlEngine::new(
        fetcher,
        locator,
        normalizer,
        CrawlOptions::from(&config.crawler),
    );

    let outcome = engine.crawl(seed.as_str()).await?;
    let top_words = top_n(&outcome.words, config.report.top_n);
    let report = CrawlReport::new(seed.as_str(), started_at, &outcome, top_words);

    let location = match storage {
        Some(storage) => Some(storage.write_report(&report).await?),
        None => None,
    };

    Ok(CrawlRun {
        outcome,
        report,
        location,
    })
}

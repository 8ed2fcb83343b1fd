//! Storage abstractions for crawl reports.
//!
//! Only finished reports are stored; crawl state is never persisted.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CrawlReport;

pub use local::LocalStorage;

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Write a report, returning where it was stored.
    async fn write_report(&self, report: &CrawlReport) -> Result<String>;

    /// Load the stored report, `None` when nothing was written yet.
    async fn load_report(&self) -> Result<Option<CrawlReport>>;
}

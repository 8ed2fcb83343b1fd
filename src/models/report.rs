//! Crawl results and the word frequency report.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A word and how often it occurred across the crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: usize) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Everything a finished crawl produced.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Every URL fetched or attempted, seed included
    pub visited: BTreeSet<String>,
    /// Cleaned tokens in append order, duplicates kept
    pub words: Vec<String>,
    /// Depth levels processed, seed level included
    pub levels: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    /// Whether the crawl deadline cut the traversal short
    pub deadline_hit: bool,
}

impl CrawlOutcome {
    /// Link hops followed beyond the seed page.
    pub fn hops(&self) -> usize {
        self.levels.saturating_sub(1)
    }
}

/// Serializable summary written by `--output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub levels: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub deadline_hit: bool,
    pub visited: Vec<String>,
    pub total_words: usize,
    pub top_words: Vec<WordCount>,
}

impl CrawlReport {
    pub fn new(
        seed: impl Into<String>,
        started_at: DateTime<Utc>,
        outcome: &CrawlOutcome,
        top_words: Vec<WordCount>,
    ) -> Self {
        Self {
            seed: seed.into(),
            started_at,
            finished_at: Utc::now(),
            levels: outcome.levels,
            pages_fetched: outcome.pages_fetched,
            pages_failed: outcome.pages_failed,
            deadline_hit: outcome.deadline_hit,
            visited: outcome.visited.iter().cloned().collect(),
            total_words: outcome.words.len(),
            top_words,
        }
    }
}

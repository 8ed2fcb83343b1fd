//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::RuleConfig;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and traversal settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Frequency report settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Text normalization settings
    #[serde(default)]
    pub text: TextConfig,

    /// Per-domain content rules, layered over the built-in table
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        for rule in &self.rules {
            if rule.domain.trim().is_empty() {
                return Err(AppError::validation("rules.domain is empty"));
            }
            if rule.link_pattern.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "rules.link_pattern is empty for {}",
                    rule.domain
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client and traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Deadline for a whole crawl in seconds, 0 disables it
    #[serde(default)]
    pub crawl_deadline_secs: u64,

    /// Maximum concurrent fetches within one level
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Link hops to follow beyond the seed page
    #[serde(default = "defaults::max_depth")]
    pub max_depth: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            crawl_deadline_secs: 0,
            max_concurrent: defaults::max_concurrent(),
            max_depth: defaults::max_depth(),
        }
    }
}

/// Frequency report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of entries in the report
    #[serde(default = "defaults::top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::top_n(),
        }
    }
}

/// Text normalization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextConfig {
    /// Replaces the built-in English stop-word list when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words_file: Option<PathBuf>,
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; wordcrawl/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn max_depth() -> usize {
        2
    }
    pub fn top_n() -> usize {
        50
    }
}

// src/models/rule.rs

//! Per-domain content rule records.

use serde::{Deserialize, Serialize};

/// Link pattern for domains without a registered rule: one path segment.
pub const DEFAULT_LINK_PATTERN: &str = r"^/(?P<slug>[\w-]+)$";

/// Where a domain keeps its article text and which paths are crawlable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Exact domain (authority) the rule applies to
    pub domain: String,

    /// CSS selector of the content region; the whole document when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_selector: Option<String>,

    /// Regex a local path must match to be followed
    #[serde(default = "default_link_pattern")]
    pub link_pattern: String,
}

fn default_link_pattern() -> String {
    DEFAULT_LINK_PATTERN.to_string()
}

impl RuleConfig {
    pub fn new(
        domain: impl Into<String>,
        content_selector: Option<&str>,
        link_pattern: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            content_selector: content_selector.map(str::to_string),
            link_pattern: link_pattern.into(),
        }
    }

    /// Rules shipped with the crawler.
    pub fn builtin() -> Vec<Self> {
        vec![Self::new(
            "tim.blog",
            Some("div.content-area"),
            r"^/(?P<year>\d{4})/(?P<month>\d{2})/(?P<day>\d{2})/(?P<slug>[\w-]+)/$",
        )]
    }
}

//! Content locator service.
//!
//! Maps a domain to the markup region holding its article text and to the
//! pattern its crawlable links follow.

use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, DEFAULT_LINK_PATTERN, RuleConfig};
use crate::utils::url::domain_of;

/// A compiled content rule.
#[derive(Debug, Clone)]
pub struct ContentRule {
    selector: Option<Selector>,
    selector_source: Option<String>,
    body: Selector,
    link_pattern: Regex,
}

impl ContentRule {
    /// Compile a rule record.
    pub fn compile(config: &RuleConfig) -> Result<Self> {
        let selector = config
            .content_selector
            .as_deref()
            .map(parse_selector)
            .transpose()?;
        Ok(Self {
            selector,
            selector_source: config.content_selector.clone(),
            body: parse_selector("body")?,
            link_pattern: Regex::new(&config.link_pattern)?,
        })
    }

    /// Document body, single-segment paths.
    pub fn fallback() -> Result<Self> {
        Ok(Self {
            selector: None,
            selector_source: None,
            body: parse_selector("body")?,
            link_pattern: Regex::new(DEFAULT_LINK_PATTERN)?,
        })
    }

    /// Source of the content selector, `None` for the document body.
    pub fn selector_source(&self) -> Option<&str> {
        self.selector_source.as_deref()
    }

    /// Whether a local path is a crawlable link for this domain.
    pub fn matches_path(&self, path: &str) -> bool {
        self.link_pattern.is_match(path)
    }

    /// Apply the selector to a document.
    ///
    /// Without a selector the region is `<body>`, or the root element when
    /// the document has none. Returns `None` when the selector finds nothing.
    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        match &self.selector {
            Some(selector) => document.select(selector).next(),
            None => document
                .select(&self.body)
                .next()
                .or_else(|| Some(document.root_element())),
        }
    }
}

/// Service resolving content rules by exact domain.
pub struct ContentLocator {
    rules: HashMap<String, ContentRule>,
    fallback: ContentRule,
}

impl ContentLocator {
    /// Create a locator from exactly the given rules.
    pub fn new(rules: &[RuleConfig]) -> Result<Self> {
        let mut compiled = HashMap::with_capacity(rules.len());
        for rule in rules {
            compiled.insert(rule.domain.trim().to_lowercase(), ContentRule::compile(rule)?);
        }
        Ok(Self {
            rules: compiled,
            fallback: ContentRule::fallback()?,
        })
    }

    /// Create a locator from the built-in rules overlaid with configured ones.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut rules = RuleConfig::builtin();
        rules.extend(config.rules.iter().cloned());
        let locator = Self::new(&rules)?;
        log::debug!("Loaded {} content rules", locator.rules.len());
        Ok(locator)
    }

    /// Rule registered for the domain, or the fallback rule.
    pub fn rule_for(&self, domain: &str) -> &ContentRule {
        self.rules
            .get(&domain.to_lowercase())
            .unwrap_or(&self.fallback)
    }

    /// Whether a domain has its own rule.
    pub fn is_registered(&self, domain: &str) -> bool {
        self.rules.contains_key(&domain.to_lowercase())
    }

    /// Content region of a page, `None` when the rule's target is absent.
    pub fn locate<'a>(&self, document: &'a Html, url: &str) -> Option<ElementRef<'a>> {
        self.rule_for(&domain_of(url)).locate(document)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience functions that turn a configuration file into the pieces a
//! crawl is built from.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::services::{ContentLocator, StopWords, TextNormalizer};

/// Load configuration from an optional TOML file.
///
/// Without a path, or when loading fails, the defaults are used.
pub fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    }
}

/// Load the stop-word list named by the configuration.
///
/// Falls back to the built-in English list when no file is configured.
pub fn load_stop_words(config: &Config) -> Result<StopWords> {
    match &config.text.stop_words_file {
        Some(path) => {
            let stop_words = StopWords::from_file(path)?;
            log::info!(
                "Loaded {} stop words from {}",
                stop_words.len(),
                path.display()
            );
            Ok(stop_words)
        }
        None => Ok(StopWords::english()),
    }
}

/// Validate the configuration and build the locator and normalizer.
pub fn load_components(config: &Config) -> Result<(ContentLocator, TextNormalizer)> {
    config.validate()?;
    let locator = ContentLocator::from_config(config)?;
    let normalizer = TextNormalizer::new(load_stop_words(config)?);
    Ok((locator, normalizer))
}

// src/utils/url.rs

//! URL normalization, validation and decomposition.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{AppError, Result};

/// Prefix `http://` when the input carries no `scheme://` part.
///
/// Never upgrades to https.
///
/// # Examples
/// ```
/// use wordcrawl::utils::url::normalize_scheme;
///
/// assert_eq!(normalize_scheme("tim.blog"), "http://tim.blog");
/// assert_eq!(normalize_scheme("https://tim.blog"), "https://tim.blog");
/// ```
pub fn normalize_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn has_scheme(input: &str) -> bool {
    let Some((scheme, _)) = input.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Check that a normalized URL is an http(s) URL with a host.
pub fn validate(url: &str) -> Result<Url> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::invalid_url(url));
    }
    let parsed = Url::parse(url).map_err(|_| AppError::invalid_url(url))?;
    if parsed.host_str().is_none() {
        return Err(AppError::invalid_url(url));
    }
    Ok(parsed)
}

/// Authority of a URL: host plus an explicit non-default port.
///
/// Relative links have no authority and yield an empty string.
/// Protocol-relative links (`//host/path`) yield their host.
///
/// # Examples
/// ```
/// use wordcrawl::utils::url::domain_of;
///
/// assert_eq!(domain_of("https://Tim.Blog/2020/"), "tim.blog");
/// assert_eq!(domain_of("/2020/01/01/post/"), "");
/// ```
pub fn domain_of(url: &str) -> String {
    parse_absolute(url)
        .map(|parsed| authority(&parsed))
        .unwrap_or_default()
}

/// Base for resolving relative links whose page is unknown.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Path component of a URL with query and fragment dropped.
///
/// Relative links are resolved against a placeholder root, so both forms
/// get the same dot-segment handling. The result is percent-decoded.
///
/// # Examples
/// ```
/// use wordcrawl::utils::url::path_of;
///
/// assert_eq!(path_of("http://site.test/caf%C3%A9?x=1"), "/café");
/// assert_eq!(path_of("/a/../café#top"), "/café");
/// ```
pub fn path_of(url: &str) -> String {
    let parsed = match parse_absolute(url) {
        Some(parsed) if parsed.has_host() => Some(parsed),
        Some(_) => None,
        None => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(url))
            .ok(),
    };
    match parsed {
        Some(parsed) => decode_path(parsed.path()),
        None => decode_path(strip_query_and_fragment(url)),
    }
}

/// Resolve a local path against the scheme and authority of a page URL.
pub fn origin_join(page: &Url, path: &str) -> Result<Url> {
    Ok(page.join(path)?)
}

fn parse_absolute(url: &str) -> Option<Url> {
    if url.starts_with("//") {
        Url::parse(&format!("http:{url}")).ok()
    } else {
        Url::parse(url).ok()
    }
}

fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn strip_query_and_fragment(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

// src/services/crawler.rs

//! Crawl engine.
//!
//! Expands the crawl level by level: every URL of the current frontier is
//! fetched before links discovered on those pages are followed. The engine
//! alone owns the frontier, the visited set and the word stream; fetches of
//! one level run on a bounded pool and report back to it.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use scraper::Html;
use tokio::time::Instant;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CrawlOutcome, CrawlerConfig};
use crate::services::{ContentLocator, TextNormalizer, local_matching_paths};
use crate::utils::http::PageFetcher;
use crate::utils::url::{domain_of, origin_join, validate};

/// Traversal limits.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Link hops followed beyond the seed page
    pub max_depth: usize,
    /// Concurrent fetches within one level
    pub max_concurrent: usize,
    /// Wall-clock budget of the whole crawl
    pub deadline: Option<Duration>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_concurrent: config.max_concurrent,
            deadline: (config.crawl_deadline_secs > 0)
                .then(|| Duration::from_secs(config.crawl_deadline_secs)),
        }
    }
}

/// What a single page contributed.
#[derive(Debug, Default)]
struct PageContents {
    links: BTreeSet<String>,
    words: Vec<String>,
}

/// Depth-bounded breadth-first crawler.
pub struct CrawlEngine {
    fetcher: Arc<dyn PageFetcher>,
    locator: ContentLocator,
    normalizer: TextNormalizer,
    options: CrawlOptions,
}

impl CrawlEngine {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        locator: ContentLocator,
        normalizer: TextNormalizer,
        options: CrawlOptions,
    ) -> Self {
        Self {
            fetcher,
            locator,
            normalizer,
            options,
        }
    }

    /// Crawl from a seed URL.
    ///
    /// Fails only when the seed is not a valid http(s) URL. Pages that
    /// cannot be fetched are marked visited and contribute nothing.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome> {
        let seed = validate(seed)?;
        let deadline = self.options.deadline.map(|budget| Instant::now() + budget);
        let concurrency = self.options.max_concurrent.max(1);

        log::info!(
            "Crawling {} (max depth {}, concurrency {})",
            seed,
            self.options.max_depth,
            concurrency
        );

        let mut outcome = CrawlOutcome::default();
        let mut frontier = BTreeSet::from([seed.to_string()]);
        let mut depth = 0;

        loop {
            let batch: Vec<String> = frontier
                .into_iter()
                .filter(|url| !outcome.visited.contains(url))
                .collect();
            let batch_len = batch.len();

            let mut next_frontier = BTreeSet::new();
            let mut pages = stream::iter(batch)
                .map(|url| async move {
                    let contents = self.visit(&url).await;
                    (url, contents)
                })
                .buffer_unordered(concurrency);

            loop {
                let next = match deadline {
                    Some(at) => match tokio::time::timeout_at(at, pages.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            outcome.deadline_hit = true;
                            break;
                        }
                    },
                    None => pages.next().await,
                };
                let Some((url, contents)) = next else {
                    break;
                };

                match contents {
                    Some(contents) => {
                        outcome.pages_fetched += 1;
                        outcome.words.extend(contents.words);
                        next_frontier.extend(contents.links);
                    }
                    None => outcome.pages_failed += 1,
                }
                outcome.visited.insert(url);
            }
            drop(pages);

            outcome.levels += 1;
            next_frontier.retain(|url| !outcome.visited.contains(url));

            log::info!(
                "Level {} done: {} page(s), {} new link(s), {} word(s) so far",
                depth,
                batch_len,
                next_frontier.len(),
                outcome.words.len()
            );

            if outcome.deadline_hit {
                log::warn!(
                    "Crawl deadline reached at level {}; {} link(s) left unvisited",
                    depth,
                    next_frontier.len()
                );
                break;
            }
            if depth >= self.options.max_depth || next_frontier.is_empty() {
                break;
            }

            frontier = next_frontier;
            depth += 1;
        }

        log::info!(
            "Crawl finished after {} hop(s): {} visited, {} failed, {} word(s)",
            outcome.hops(),
            outcome.visited.len(),
            outcome.pages_failed,
            outcome.words.len()
        );

        Ok(outcome)
    }

    /// Fetch one page; `None` when it could not be fetched.
    async fn visit(&self, url: &str) -> Option<PageContents> {
        log::debug!("Fetching {}", url);
        let result = self.fetcher.fetch(url).await.and_then(|page| {
            if page.is_success() {
                Ok(page)
            } else {
                Err(AppError::Status {
                    url: url.to_string(),
                    status: page.status,
                })
            }
        });

        match result {
            Ok(page) => Some(self.extract(url, &page.body)),
            Err(error) if error.is_page_failure() => {
                log::warn!("Skipping {}: {}", url, error);
                None
            }
            Err(error) => {
                log::error!("Unexpected error fetching {}: {}", url, error);
                None
            }
        }
    }

    /// Words and absolute local links of a fetched page.
    fn extract(&self, url: &str, body: &str) -> PageContents {
        let document = Html::parse_document(body);
        let rule = self.locator.rule_for(&domain_of(url));

        let Some(region) = rule.locate(&document) else {
            log::debug!("No content region on {}", url);
            return PageContents::default();
        };

        let links = match Url::parse(url) {
            Ok(page_url) => local_matching_paths(region, url, rule)
                .iter()
                .filter_map(|path| origin_join(&page_url, path).ok())
                .map(String::from)
                .collect(),
            Err(_) => BTreeSet::new(),
        };

        PageContents {
            links,
            words: self.normalizer.normalize_region(region),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::RuleConfig;
    use crate::services::StopWords;
    use crate::utils::http::FetchedPage;

    /// Serves canned pages and records every fetch.
    #[derive(Default)]
    struct StaticFetcher {
        pages: HashMap<String, FetchedPage>,
        fetched: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl StaticFetcher {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status: 200,
                    body: body.to_string(),
                },
            );
            self
        }

        fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status,
                    body: "<p>error page words</p>".to_string(),
                },
            );
            self
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            self.fetched.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::config(format!("connection refused: {url}")))
        }
    }

    fn engine(fetcher: Arc<StaticFetcher>, rules: &[RuleConfig], max_depth: usize) -> CrawlEngine {
        let stop_words: StopWords = ["the", "a", "to"].into_iter().collect();
        CrawlEngine::new(
            fetcher,
            ContentLocator::new(rules).unwrap(),
            TextNormalizer::new(stop_words),
            CrawlOptions {
                max_depth,
                max_concurrent: 1,
                deadline: None,
            },
        )
    }

    fn set(urls: &[&str]) -> BTreeSet<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_invalid_seed_fails_before_fetching() {
        let fetcher = Arc::new(StaticFetcher::default());
        let result = engine(Arc::clone(&fetcher), &[], 3).crawl("ftp://site.test").await;
        assert!(matches!(result, Err(AppError::InvalidUrl(_))));
        assert!(fetcher.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_zero_depth_fetches_only_seed() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .page("http://site.test/", r#"<a href="/one">one</a> Seed words"#)
                .page("http://site.test/one", "One"),
        );
        let outcome = engine(Arc::clone(&fetcher), &[], 0)
            .crawl("http://site.test/")
            .await
            .unwrap();

        assert_eq!(fetcher.fetched(), vec!["http://site.test/"]);
        assert_eq!(outcome.visited, set(&["http://site.test/"]));
        assert_eq!(outcome.levels, 1);
        assert_eq!(outcome.words, vec!["one", "seed", "words"]);
    }

    #[tokio::test]
    async fn test_page_without_links_ends_after_first_level() {
        let fetcher = Arc::new(
            StaticFetcher::default().page("http://example.test/", "<p>Nothing to follow here</p>"),
        );
        let outcome = engine(Arc::clone(&fetcher), &[], 10)
            .crawl("http://example.test/")
            .await
            .unwrap();

        assert_eq!(outcome.levels, 1);
        assert_eq!(outcome.hops(), 0);
        assert_eq!(outcome.visited, set(&["http://example.test/"]));
        assert_eq!(outcome.words, vec!["nothing", "follow", "here"]);
    }

    #[tokio::test]
    async fn test_cycle_terminates_and_visits_each_page_once() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .page("http://site.test/home", r#"<a href="/a">A</a>"#)
                .page("http://site.test/a", r#"<a href="/b">B</a> <a href="/a">self</a>"#)
                .page("http://site.test/b", r#"<a href="/home">home</a>"#),
        );
        let outcome = engine(Arc::clone(&fetcher), &[], 2)
            .crawl("http://site.test/home")
            .await
            .unwrap();

        assert_eq!(
            outcome.visited,
            set(&[
                "http://site.test/home",
                "http://site.test/a",
                "http://site.test/b"
            ])
        );
        assert_eq!(
            fetcher.fetched(),
            vec![
                "http://site.test/home",
                "http://site.test/a",
                "http://site.test/b"
            ]
        );
        assert_eq!(outcome.levels, 3);
        assert_eq!(outcome.hops(), 2);
    }

    #[tokio::test]
    async fn test_depth_limit_stops_expansion() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .page("http://site.test/home", r#"<a href="/a">A</a>"#)
                .page("http://site.test/a", r#"<a href="/b">B</a>"#)
                .page("http://site.test/b", "deep"),
        );
        let outcome = engine(Arc::clone(&fetcher), &[], 1)
            .crawl("http://site.test/home")
            .await
            .unwrap();

        assert_eq!(
            outcome.visited,
            set(&["http://site.test/home", "http://site.test/a"])
        );
        assert!(!outcome.words.contains(&"deep".to_string()));
    }

    #[tokio::test]
    async fn test_failed_pages_are_visited_but_empty() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .page(
                    "http://site.test/home",
                    r#"<a href="/gone">x</a><a href="/down">y</a><a href="/ok">z</a>"#,
                )
                .status("http://site.test/gone", 404)
                .page("http://site.test/ok", r#"Fine <a href="/gone">again</a>"#),
        );
        let outcome = engine(Arc::clone(&fetcher), &[], 3)
            .crawl("http://site.test/home")
            .await
            .unwrap();

        assert_eq!(outcome.pages_failed, 2);
        assert_eq!(outcome.pages_fetched, 2);
        assert!(outcome.visited.contains("http://site.test/gone"));
        assert!(outcome.visited.contains("http://site.test/down"));
        assert!(!outcome.words.contains(&"error".to_string()));
        let gone_fetches = fetcher
            .fetched()
            .iter()
            .filter(|u| u.as_str() == "http://site.test/gone")
            .count();
        assert_eq!(gone_fetches, 1);
    }

    #[tokio::test]
    async fn test_missing_region_contributes_nothing() {
        let rules = [RuleConfig::new(
            "site.test",
            Some("div.content-area"),
            r"^/[\w-]+$",
        )];
        let fetcher = Arc::new(
            StaticFetcher::default()
                .page(
                    "http://site.test/home",
                    r#"<div class="content-area">Intro <a href="/bare">bare</a></div>"#,
                )
                .page("http://site.test/bare", r#"Outside <a href="/never">never</a>"#),
        );
        let outcome = engine(Arc::clone(&fetcher), &rules, 5)
            .crawl("http://site.test/home")
            .await
            .unwrap();

        assert_eq!(outcome.words, vec!["intro", "bare"]);
        assert_eq!(
            outcome.visited,
            set(&["http://site.test/home", "http://site.test/bare"])
        );
        assert_eq!(outcome.pages_failed, 0);
    }

    #[tokio::test]
    async fn test_shared_links_fetched_once_with_concurrency() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .page(
                    "http://site.test/home",
                    r#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>"#,
                )
                .page("http://site.test/a", r#"<a href="/shared">s</a>"#)
                .page("http://site.test/b", r#"<a href="/shared">s</a>"#)
                .page("http://site.test/c", r#"<a href="/shared">s</a>"#)
                .page("http://site.test/shared", "shared"),
        );
        let mut engine = engine(Arc::clone(&fetcher), &[], 3);
        engine.options.max_concurrent = 4;
        let outcome = engine.crawl("http://site.test/home").await.unwrap();

        let fetched = fetcher.fetched();
        assert_eq!(fetched.len(), 5);
        assert_eq!(outcome.visited.len(), 5);
        assert_eq!(
            fetched
                .iter()
                .filter(|u| u.as_str() == "http://site.test/shared")
                .count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cuts_crawl_short() {
        let fetcher = Arc::new(StaticFetcher {
            delay: Some(Duration::from_secs(10)),
            ..StaticFetcher::default()
                .page("http://site.test/home", r#"<a href="/a">a</a>"#)
                .page("http://site.test/a", "late")
        });
        let mut engine = engine(Arc::clone(&fetcher), &[], 3);
        engine.options.deadline = Some(Duration::from_secs(15));
        let outcome = engine.crawl("http://site.test/home").await.unwrap();

        assert!(outcome.deadline_hit);
        assert_eq!(outcome.visited, set(&["http://site.test/home"]));
        assert_eq!(outcome.levels, 2);
    }
}

//! Link extraction from a content region.

use std::collections::BTreeSet;

use scraper::ElementRef;

use crate::services::ContentRule;
use crate::utils::url::{domain_of, path_of};

/// Every `href` of an anchor in the region, in document order.
///
/// No filtering: duplicates, relative and cross-domain links are all kept.
pub fn extract_links(region: ElementRef<'_>) -> Vec<String> {
    region
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Local paths referenced by the region that match the domain's rule.
pub fn local_matching_paths(
    region: ElementRef<'_>,
    page_url: &str,
    rule: &ContentRule,
) -> BTreeSet<String> {
    let domain = domain_of(page_url);
    extract_links(region)
        .iter()
        .filter_map(|link| local_candidate(link, &domain))
        .filter(|path| rule.matches_path(path))
        .collect()
}

/// Path of a link when it points into `domain`.
fn local_candidate(link: &str, domain: &str) -> Option<String> {
    let link = link.trim();
    if domain_of(link) == domain {
        Some(path_of(link))
    } else if link.starts_with('/') && !link.starts_with("//") {
        Some(path_of(link))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;
    use crate::models::RuleConfig;
    use crate::services::ContentLocator;

    fn region_of<'a>(html: &'a Html, locator: &ContentLocator, url: &str) -> ElementRef<'a> {
        locator.locate(html, url).unwrap()
    }

    #[test]
    fn test_extract_links_keeps_everything_in_order() {
        let html = Html::parse_document(
            r#"<a href="/b">b</a><a>no href</a><a href="https://x.test/">x</a><a href="/b">again</a>"#,
        );
        let links = extract_links(html.root_element());
        assert_eq!(links, vec!["/b", "https://x.test/", "/b"]);
    }

    #[test]
    fn test_registered_domain_excludes_external_links() {
        let locator = ContentLocator::new(&[RuleConfig::new(
            "blog.test",
            Some("div.content-area"),
            r"^/posts/[\w-]+$",
        )])
        .unwrap();
        let html = Html::parse_document(
            r#"<body>
                <a href="/posts/outside-region">skip</a>
                <div class="content-area">
                    <a href="/posts/first">one</a>
                    <a href="http://blog.test/posts/second?ref=home">two</a>
                    <a href="http://elsewhere.test/posts/third">external</a>
                </div>
            </body>"#,
        );
        let url = "http://blog.test/";
        let region = region_of(&html, &locator, url);
        let paths = local_matching_paths(region, url, locator.rule_for("blog.test"));
        assert_eq!(
            paths.into_iter().collect::<Vec<_>>(),
            vec!["/posts/first", "/posts/second"]
        );
    }

    #[test]
    fn test_relative_candidate_is_the_current_link() {
        let locator = ContentLocator::new(&[]).unwrap();
        let html = Html::parse_document(
            r#"<a href="http://site.test/first">a</a><a href="/second">b</a><a href="/third">c</a>"#,
        );
        let url = "http://site.test/";
        let paths = local_matching_paths(html.root_element(), url, locator.rule_for("site.test"));
        assert_eq!(
            paths.into_iter().collect::<Vec<_>>(),
            vec!["/first", "/second", "/third"]
        );
    }

    #[test]
    fn test_non_matching_and_protocol_relative_links_dropped() {
        let locator = ContentLocator::new(&[]).unwrap();
        let html = Html::parse_document(
            r##"<a href="/a/b">nested</a><a href="//cdn.test/lib">cdn</a>
                <a href="mailto:me@site.test">mail</a><a href="#top">anchor</a>
                <a href="relative">relative</a><a href="/ok#frag">ok</a>"##,
        );
        let url = "http://site.test/";
        let paths = local_matching_paths(html.root_element(), url, locator.rule_for("site.test"));
        assert_eq!(paths.into_iter().collect::<Vec<_>>(), vec!["/ok"]);
    }

    #[test]
    fn test_absolute_and_relative_forms_give_same_paths() {
        let locator = ContentLocator::new(&[]).unwrap();
        let url = "http://site.test/";
        let rule = locator.rule_for("site.test");
        let paths_for = |body: &str| {
            let html = Html::parse_document(body);
            local_matching_paths(html.root_element(), url, rule)
        };

        let absolute = paths_for(
            r#"<a href="http://site.test/café">a</a><a href="http://site.test/a/../b">b</a>"#,
        );
        let relative = paths_for(r#"<a href="/café">a</a><a href="/a/../b">b</a>"#);
        let encoded = paths_for(r#"<a href="/caf%C3%A9">a</a>"#);

        assert_eq!(absolute, relative);
        assert_eq!(absolute.into_iter().collect::<Vec<_>>(), vec!["/b", "/café"]);
        assert_eq!(encoded.into_iter().collect::<Vec<_>>(), vec!["/café"]);
    }
}

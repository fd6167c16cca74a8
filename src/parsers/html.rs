use crate::filter::{self, UrlFilter};
use crate::parsers::links::LinkSet;
use crate::results::Link;
use crate::utils::collapse_whitespace;
use scraper::{Html, Selector};
use url::Url;

/// Elements whose text never counts as page content
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Extracts anchors as links, resolving each href against `base`.
///
/// Anchors with no visible text, or whose href is filtered or unresolvable, are skipped.
pub fn extract_links(doc: &Html, base: &Url, url_filter: &UrlFilter) -> Vec<Link> {
    let link_selector = Selector::parse("a[href]").unwrap();
    let mut set = LinkSet::new(base);
    let mut anchors = 0usize;

    for element in doc.select(&link_selector) {
        anchors += 1;
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.trim().is_empty() || url_filter.is_non_content_link(href) {
            ::log::trace!("URL filter rejected: {}", href);
            continue;
        }

        let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
        if text.is_empty() {
            continue;
        }

        if let Some(resolved) = filter::resolve(href, base) {
            set.push(resolved, text);
        }
    }

    ::log::debug!("HTML parser found {} links in {} anchors", set.len(), anchors);
    set.into_links()
}

/// Text of the first non-empty `<title>` element
pub fn extract_title(doc: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").unwrap();
    doc.select(&title_selector)
        .map(|e| collapse_whitespace(&e.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// Visible body text with whitespace collapsed, unbounded
pub fn extract_text(doc: &Html) -> String {
    let body_selector = Selector::parse("body").unwrap();
    let mut parts: Vec<&str> = Vec::new();

    for body in doc.select(&body_selector) {
        for node in body.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
            });
            if !hidden {
                parts.push(text);
            }
        }
    }

    collapse_whitespace(&parts.join(" "))
}

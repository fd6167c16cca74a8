use crate::filter::{self, UrlFilter};
use crate::results::{Link, LinkType};
use crate::utils::{ELLIPSIS, capitalize_words};
use std::collections::HashSet;
use url::Url;

/// Raw URLs longer than this are shortened when used as display text
const RAW_TEXT_MAX_CHARS: usize = 50;

/// Ordered, deduplicated link accumulator for a single extraction pass
pub struct LinkSet {
    base_host: Option<String>,
    seen: HashSet<String>,
    links: Vec<Link>,
}

impl LinkSet {
    /// Creates an empty set classifying links against `base`'s host
    pub fn new(base: &Url) -> Self {
        Self {
            base_host: base.host_str().map(|h| h.to_string()),
            seen: HashSet::new(),
            links: Vec::new(),
        }
    }

    /// Admits a resolved absolute URL unless it was already admitted.
    ///
    /// Returns false when the URL is a duplicate or does not parse.
    pub fn push(&mut self, resolved: String, text: String) -> bool {
        if self.seen.contains(&resolved) {
            ::log::trace!("Skipping duplicate link: {}", resolved);
            return false;
        }

        let link_type = match Url::parse(&resolved) {
            Ok(url) => classify(&url, self.base_host.as_deref()),
            Err(_) => return false,
        };

        self.seen.insert(resolved.clone());
        self.links.push(Link::new(resolved, text, link_type));
        true
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_links(self) -> Vec<Link> {
        self.links
    }
}

/// Internal iff the hostname equals the base hostname exactly
pub fn classify(url: &Url, base_host: Option<&str>) -> LinkType {
    match (url.host_str(), base_host) {
        (Some(host), Some(base)) if host == base => LinkType::Internal,
        _ => LinkType::External,
    }
}

/// Builds links from a list of URLs discovered by the renderer.
///
/// Display text is synthesized from each URL since no anchor text is available.
pub fn from_url_list(urls: &[String], base: &Url, url_filter: &UrlFilter) -> Vec<Link> {
    let mut set = LinkSet::new(base);

    for raw in urls {
        if url_filter.is_non_content_link(raw) {
            ::log::trace!("URL filter rejected: {}", raw);
            continue;
        }

        let Some(resolved) = filter::resolve(raw, base) else {
            ::log::trace!("Dropping unresolvable URL: {}", raw);
            continue;
        };

        let text = display_text_from_url(&resolved);
        set.push(resolved, text);
    }

    ::log::debug!(
        "Link list produced {} links from {} URLs",
        set.len(),
        urls.len()
    );
    set.into_links()
}

/// Derives readable text from a URL: `/docs/getting-started.html` becomes
/// `Getting Started`, a bare host becomes the host without `www.`.
pub fn display_text_from_url(raw: &str) -> String {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return shorten_raw(raw),
    };

    let last_segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last());

    match last_segment {
        Some(segment) => {
            let stem = match segment.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem,
                _ => segment,
            };
            let words = capitalize_words(&stem.replace(['-', '_'], " "));
            if words.is_empty() {
                host_text(&url).unwrap_or_else(|| shorten_raw(raw))
            } else {
                words
            }
        }
        None => host_text(&url).unwrap_or_else(|| shorten_raw(raw)),
    }
}

fn host_text(url: &Url) -> Option<String> {
    url.host_str()
        .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
}

fn shorten_raw(raw: &str) -> String {
    match raw.char_indices().nth(RAW_TEXT_MAX_CHARS) {
        Some((idx, _)) => format!("{}{}", &raw[..idx], ELLIPSIS),
        None => raw.to_string(),
    }
}

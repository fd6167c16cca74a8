use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// One entry of the non-content rule table. A href matching any rule is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterRule {
    /// Hrefs that only point inside the current page (`#section`)
    FragmentOnly,

    /// Hrefs starting with the given scheme, e.g. `mailto:`
    Scheme(String),

    /// File extensions (without the dot) that never point at a page
    Extensions(Vec<String>),

    /// Case-insensitive regex matched anywhere in the href
    Pattern(String),
}

/// Configuration for non-content link filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Rules checked in order; the first match rejects the href
    #[serde(default = "default_rules")]
    pub rules: Vec<FilterRule>,
}

impl Default for UrlFilterConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Default rule table
fn default_rules() -> Vec<FilterRule> {
    let extensions = |list: &[&str]| list.iter().map(|e| e.to_string()).collect::<Vec<_>>();

    vec![
        FilterRule::FragmentOnly,
        FilterRule::Scheme("mailto:".to_string()),
        FilterRule::Scheme("tel:".to_string()),
        FilterRule::Scheme("ftp:".to_string()),
        FilterRule::Scheme("file:".to_string()),
        FilterRule::Scheme("javascript:".to_string()),
        FilterRule::Scheme("data:".to_string()),
        // Styles, scripts and data files
        FilterRule::Extensions(extensions(&[
            "css", "js", "mjs", "map", "json", "xml", "csv", "rss", "atom",
        ])),
        // Images and fonts
        FilterRule::Extensions(extensions(&[
            "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "bmp", "tif", "tiff", "avif",
            "woff", "woff2", "ttf", "otf", "eot",
        ])),
        // Archives and binaries
        FilterRule::Extensions(extensions(&[
            "zip", "tar", "gz", "tgz", "bz2", "rar", "7z", "exe", "dmg", "iso", "apk",
        ])),
        // Audio and video
        FilterRule::Extensions(extensions(&[
            "mp3", "wav", "ogg", "flac", "aac", "m4a", "mp4", "avi", "mov", "webm", "mkv",
            "wmv",
        ])),
        // Office documents
        FilterRule::Extensions(extensions(&[
            "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp",
        ])),
        // Feeds and sitemaps
        FilterRule::Pattern(r"/(feed|rss|atom)(/|\.xml|\?|$)".to_string()),
        FilterRule::Pattern(r"sitemap".to_string()),
        // Static asset directories
        FilterRule::Pattern(r"/(wp-content|wp-includes|static|assets|_next|cdn-cgi)/".to_string()),
        // Print and download variants
        FilterRule::Pattern(r"(/print/|[?&]print=|/download/|[?&]download=)".to_string()),
        FilterRule::Pattern(r"[?&]format=".to_string()),
        // Tracking pixels and redirectors
        FilterRule::Pattern(r"/(track|tracking|pixel|beacon)(/|\.gif|\?|$)".to_string()),
        FilterRule::Pattern(r"(doubleclick\.net|google-analytics\.com|facebook\.com/tr)".to_string()),
    ]
}

#[derive(Debug)]
enum CompiledRule {
    FragmentOnly,
    Scheme(String),
    Extensions(Vec<String>),
    Pattern(Regex),
}

/// Rejects hrefs that cannot lead to page content
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    compiled: Vec<CompiledRule>,
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new(UrlFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let mut compiled = Vec::with_capacity(config.rules.len());
        for rule in &config.rules {
            compiled.push(match rule {
                FilterRule::FragmentOnly => CompiledRule::FragmentOnly,
                FilterRule::Scheme(scheme) => CompiledRule::Scheme(scheme.to_ascii_lowercase()),
                FilterRule::Extensions(exts) => CompiledRule::Extensions(
                    exts.iter()
                        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                        .collect(),
                ),
                FilterRule::Pattern(pattern) => {
                    CompiledRule::Pattern(Regex::new(&format!("(?i){}", pattern))?)
                }
            });
        }

        Ok(Self { config, compiled })
    }

    /// Returns true when `href` should never reach the link set
    pub fn is_non_content_link(&self, href: &str) -> bool {
        self.matching_rule(href).is_some()
    }

    /// Returns the first rule that rejects `href`, if any
    pub fn matching_rule(&self, href: &str) -> Option<&FilterRule> {
        let href = href.trim();
        let lower = href.to_ascii_lowercase();

        self.compiled
            .iter()
            .zip(&self.config.rules)
            .find(|(compiled, _)| match compiled {
                CompiledRule::FragmentOnly => lower.starts_with('#'),
                CompiledRule::Scheme(scheme) => lower.starts_with(scheme.as_str()),
                CompiledRule::Extensions(exts) => match file_extension(&lower) {
                    Some(ext) => exts.iter().any(|e| e == ext),
                    None => false,
                },
                CompiledRule::Pattern(regex) => regex.is_match(href),
            })
            .map(|(_, rule)| rule)
    }
}

/// Extension of the last path segment, ignoring query and fragment
fn file_extension(href: &str) -> Option<&str> {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    let path = &href[..end];
    // Skip past the authority so `example.com` is not read as an extension
    let path = match path.find("//") {
        Some(idx) => match path[idx + 2..].find('/') {
            Some(slash) => &path[idx + 2 + slash..],
            None => return None,
        },
        None => path,
    };
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Resolves `href` against `base` into an absolute http(s) URL string.
///
/// Returns `None` for empty hrefs and for anything that does not parse once
/// resolved; callers drop those silently.
pub fn resolve(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    let resolved = if lower.starts_with("http://") || lower.starts_with("https://") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("{}:{}", base.scheme(), href)
    } else if href.starts_with('/') {
        format!("{}{}", base.origin().ascii_serialization(), href)
    } else {
        base.join(href).ok()?.to_string()
    };

    let parsed = Url::parse(&resolved).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        assert_eq!(
            resolve("https://other.org/a?b=1", &base()).as_deref(),
            Some("https://other.org/a?b=1")
        );
        assert_eq!(
            resolve("http://other.org", &base()).as_deref(),
            Some("http://other.org")
        );
    }

    #[test]
    fn test_resolve_protocol_relative() {
        assert_eq!(
            resolve("//cdn.example.net/page", &base()).as_deref(),
            Some("https://cdn.example.net/page")
        );
        let http_base = Url::parse("http://example.com/").unwrap();
        assert_eq!(
            resolve("//cdn.example.net/page", &http_base).as_deref(),
            Some("http://cdn.example.net/page")
        );
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve("/about", &base()).as_deref(),
            Some("https://example.com/about")
        );
        let port_base = Url::parse("http://localhost:8080/x/y").unwrap();
        assert_eq!(
            resolve("/docs", &port_base).as_deref(),
            Some("http://localhost:8080/docs")
        );
    }

    #[test]
    fn test_resolve_directory_relative() {
        assert_eq!(
            resolve("../docs/page.html", &base()).as_deref(),
            Some("https://example.com/docs/page.html")
        );
        assert_eq!(
            resolve("next-post", &base()).as_deref(),
            Some("https://example.com/blog/next-post")
        );
    }

    #[test]
    fn test_resolve_drops_malformed() {
        assert_eq!(resolve("", &base()), None);
        assert_eq!(resolve("   ", &base()), None);
        assert_eq!(resolve("https://", &base()), None);
        assert_eq!(resolve("//", &base()), None);
    }

    #[test]
    fn test_default_filter_rejects_assets() {
        let filter = UrlFilter::default();

        assert!(filter.is_non_content_link("/image.png"));
        assert!(filter.is_non_content_link("https://example.com/styles/main.CSS"));
        assert!(filter.is_non_content_link("/files/report.pdf?version=2"));
        assert!(filter.is_non_content_link("/media/clip.mp4#t=10"));
        assert!(filter.is_non_content_link("/downloads/archive.tar.gz"));
    }

    #[test]
    fn test_default_filter_rejects_schemes_and_fragments() {
        let filter = UrlFilter::default();

        assert!(filter.is_non_content_link("#top"));
        assert!(filter.is_non_content_link("mailto:hello@example.com"));
        assert!(filter.is_non_content_link("tel:+15551234"));
        assert!(filter.is_non_content_link("JavaScript:void(0)"));
        assert!(filter.is_non_content_link("data:text/html;base64,AAAA"));
        assert!(filter.is_non_content_link("ftp://files.example.com/a"));
        assert!(filter.is_non_content_link("file:///etc/hosts"));
    }

    #[test]
    fn test_default_filter_rejects_non_content_paths() {
        let filter = UrlFilter::default();

        assert!(filter.is_non_content_link("https://example.com/feed/"));
        assert!(filter.is_non_content_link("/blog/rss"));
        assert!(filter.is_non_content_link("/sitemap_index"));
        assert!(filter.is_non_content_link("/wp-content/uploads/x"));
        assert!(filter.is_non_content_link("/article/12?print=1"));
        assert!(filter.is_non_content_link("/report?format=csv"));
        assert!(filter.is_non_content_link("https://stats.example.com/pixel?id=3"));
    }

    #[test]
    fn test_default_filter_keeps_pages() {
        let filter = UrlFilter::default();

        assert!(!filter.is_non_content_link("https://example.com"));
        assert!(!filter.is_non_content_link("https://example.com/docs/page.html"));
        assert!(!filter.is_non_content_link("/pricing"));
        assert!(!filter.is_non_content_link("../guides/getting-started"));
        assert!(!filter.is_non_content_link("/page#section"));
        assert!(!filter.is_non_content_link("/v1.2/changelog"));
    }

    #[test]
    fn test_matching_rule_reports_first_match() {
        let filter = UrlFilter::default();

        assert_eq!(filter.matching_rule("#x"), Some(&FilterRule::FragmentOnly));
        assert_eq!(
            filter.matching_rule("mailto:a@b.c"),
            Some(&FilterRule::Scheme("mailto:".to_string()))
        );
        assert!(matches!(
            filter.matching_rule("/logo.svg"),
            Some(FilterRule::Extensions(_))
        ));
        assert_eq!(filter.matching_rule("/about"), None);
    }

    #[test]
    fn test_custom_rule_table() {
        let config = UrlFilterConfig {
            rules: vec![FilterRule::Pattern(r"/private/".to_string())],
        };
        let filter = UrlFilter::new(config).unwrap();

        assert!(filter.is_non_content_link("/PRIVATE/notes"));
        // Defaults are not applied when a table is supplied
        assert!(!filter.is_non_content_link("/image.png"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let config = UrlFilterConfig {
            rules: vec![FilterRule::Pattern("(unclosed".to_string())],
        };
        assert!(UrlFilter::new(config).is_err());
    }

    #[test]
    fn test_rule_table_from_json() {
        let json = r#"{"rules":[{"kind":"fragment_only"},{"kind":"extensions","value":["png"]}]}"#;
        let config: UrlFilterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0], FilterRule::FragmentOnly);

        let empty: UrlFilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.rules, default_rules());
    }
}

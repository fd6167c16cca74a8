pub mod html;
pub mod links;
pub mod text;

#[cfg(test)]
mod tests;

use crate::config::ExtractorConfig;
use crate::filter::UrlFilter;
use crate::results::ExtractedContent;
use scraper::Html;
use url::Url;

/// Content handed back by a renderer, in one of the two shapes it may produce
#[derive(Debug, Clone, PartialEq)]
pub enum RawPage {
    /// Rendered HTML; links are discovered from its anchors
    Markup(String),
    /// Markdown-like text plus links the renderer already discovered
    Markdown { text: String, links: Vec<String> },
}

/// Enum to represent the different content parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML parser
    Html,
    /// Markdown / plain text parser
    Markdown,
}

impl ParserType {
    /// Sniffs whether a source looks like HTML markup
    pub fn detect(source: &str) -> Self {
        let head: String = source
            .trim_start()
            .chars()
            .take(512)
            .collect::<String>()
            .to_ascii_lowercase();

        if head.starts_with("<!doctype html")
            || head.starts_with("<html")
            || head.contains("<body")
            || head.contains("<head")
        {
            ::log::debug!("Classifying source as HTML");
            ParserType::Html
        } else {
            ::log::debug!("Classifying source as Markdown");
            ParserType::Markdown
        }
    }
}

impl RawPage {
    /// Wraps a source string, choosing the shape by sniffing it.
    /// Markdown sources carry no pre-discovered links.
    pub fn detect(source: String) -> Self {
        match ParserType::detect(&source) {
            ParserType::Html => RawPage::Markup(source),
            ParserType::Markdown => RawPage::Markdown {
                text: source,
                links: Vec::new(),
            },
        }
    }

    pub fn parser_type(&self) -> ParserType {
        match self {
            RawPage::Markup(_) => ParserType::Html,
            RawPage::Markdown { .. } => ParserType::Markdown,
        }
    }
}

/// Turns a rendered page into the link set and text used for analysis
#[derive(Debug)]
pub struct Extractor {
    filter: UrlFilter,
    page_text_cap: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            filter: UrlFilter::default(),
            page_text_cap: text::DEFAULT_PAGE_TEXT_CAP,
        }
    }
}

impl Extractor {
    /// Create a new extractor from configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            filter: UrlFilter::new(config.filter)?,
            page_text_cap: config.page_text_cap,
        })
    }

    /// Extracts links, bounded text and title from a page rendered at `base_url`
    pub fn extract(&self, raw: &RawPage, base_url: &Url) -> ExtractedContent {
        let content = match raw {
            RawPage::Markup(markup) => {
                let doc = Html::parse_document(markup);
                let links = html::extract_links(&doc, base_url, &self.filter);
                let page_text = text::bound_text(&html::extract_text(&doc), self.page_text_cap);
                ExtractedContent::new(links, page_text, html::extract_title(&doc))
            }
            RawPage::Markdown {
                text: source,
                links: urls,
            } => {
                let links = links::from_url_list(urls, base_url, &self.filter);
                let page_text = text::bound_text(&text::clean_text(source), self.page_text_cap);
                ExtractedContent::new(links, page_text, text::extract_title(source))
            }
        };

        ::log::info!(
            "Extracted {} links and {} characters of text from {}",
            content.links.len(),
            content.page_text.chars().count(),
            base_url
        );
        content
    }
}

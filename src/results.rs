use serde::{Deserialize, Serialize};

/// Whether a link stays on the page's host or leaves it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Same hostname as the page it was found on
    Internal,
    /// Any other hostname
    External,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Internal => "internal",
            LinkType::External => "external",
        }
    }
}

/// A hyperlink discovered on a page, resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL of the link target
    pub url: String,

    /// Human-readable text for the link
    pub text: String,

    /// Internal or external relative to the page host
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl Link {
    pub fn new(url: String, text: String, link_type: LinkType) -> Self {
        Self {
            url,
            text,
            link_type,
        }
    }
}

/// Everything the analyzer needs to know about one rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    /// Deduplicated links in document order
    pub links: Vec<Link>,

    /// Bounded plain-text summary of the page
    pub page_text: String,

    /// Title of the page (if available)
    pub title: Option<String>,
}

impl ExtractedContent {
    pub fn new(links: Vec<Link>, page_text: String, title: Option<String>) -> Self {
        Self {
            links,
            page_text,
            title,
        }
    }
}

/// A link scored against a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedLink {
    #[serde(flatten)]
    pub link: Link,

    /// Relevance in `[0, 1]`
    pub relevance_score: f64,

    /// Short explanation of the score
    pub reasoning: String,
}

impl AnalyzedLink {
    /// Builds an analyzed link, coercing the score into `[0, 1]`
    pub fn new(link: Link, score: f64, reasoning: String) -> Self {
        Self {
            link,
            relevance_score: clamp_score(score),
            reasoning,
        }
    }
}

/// Coerces a raw score into `[0, 1]`; NaN and infinities become 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Ranked links for one `(page, query)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalysisResult {
    /// Sorted by relevance score, highest first
    pub relevant_links: Vec<AnalyzedLink>,

    /// Number of links that were considered
    pub total_analyzed: usize,

    /// How the query was understood, or why the result is degraded
    pub query_interpretation: String,
}

impl LinkAnalysisResult {
    /// An empty result carrying only an interpretation message
    pub fn empty(query_interpretation: impl Into<String>) -> Self {
        Self {
            relevant_links: Vec::new(),
            total_analyzed: 0,
            query_interpretation: query_interpretation.into(),
        }
    }
}

/// Stable sort, highest score first
pub(crate) fn sort_by_score(links: &mut [AnalyzedLink]) {
    links.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}

#![allow(clippy::too_many_arguments)]

// Re-export modules
pub mod analysis;
pub mod config;
pub mod crawlers;
pub mod filter;
pub mod format;
pub mod llm;
pub mod parsers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use analysis::LinkAnalyzer;
pub use config::CrawlConfig;
pub use crawlers::{PageRenderer, RenderError, RenderedPage, WebDriverRenderer};
pub use parsers::{Extractor, RawPage};
pub use results::{AnalyzedLink, ExtractedContent, Link, LinkAnalysisResult, LinkType};

use llm::OpenAiCompatClient;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum CrawlError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invalid link filter pattern: {0}")]
    Filter(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Outcome of one crawl: the page as extracted and its links ranked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Final URL of the page after redirects
    pub url: String,
    pub query: String,
    pub title: Option<String>,
    pub content: ExtractedContent,
    pub analysis: LinkAnalysisResult,
}

impl CrawlReport {
    pub fn to_markdown(&self) -> String {
        format::format_report(&self.url, self.title.as_deref(), &self.query, &self.analysis)
    }
}

/// Renders `url`, extracts its content and ranks its links against `query`
pub async fn run_pipeline(
    renderer: &dyn PageRenderer,
    extractor: &Extractor,
    analyzer: &LinkAnalyzer,
    url: &Url,
    query: &str,
    max_links: usize,
    timeout: Duration,
) -> Result<CrawlReport, CrawlError> {
    let rendered = renderer.render(url, timeout).await?;
    if rendered.status >= 400 {
        ::log::warn!("{} responded with status {}", rendered.final_url, rendered.status);
    }

    // Relative links resolve against the page actually loaded
    let mut content = extractor.extract(&rendered.content, &rendered.final_url);
    if content.title.is_none() {
        content.title = rendered.title;
    }

    let analysis = analyzer.analyze(&content, query, max_links).await;
    ::log::info!(
        "{} of {} links relevant: {}",
        analysis.relevant_links.len(),
        analysis.total_analyzed,
        analysis.query_interpretation
    );

    Ok(CrawlReport {
        url: rendered.final_url.to_string(),
        query: query.to_string(),
        title: content.title.clone(),
        content,
        analysis,
    })
}

/// Main builder for a query-directed crawl of one page
pub struct Crawl {
    url: String,
    query: String,
    max_links: Option<usize>,
    timeout: Option<Duration>,
    webdriver_url: Option<String>,
    config: CrawlConfig,
}

impl Crawl {
    /// Create a new Crawl builder for the given page and query
    pub fn new(url: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: query.into(),
            max_links: None,
            timeout: None,
            webdriver_url: None,
            config: CrawlConfig::default(),
        }
    }

    /// Set the number of links handed to the analyzer
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = Some(max_links);
        self
    }

    /// Set the render timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(timeout_seconds));
        self
    }

    /// Set the WebDriver endpoint, overriding config and environment
    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.webdriver_url = Some(webdriver_url.into());
        self
    }

    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = CrawlConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = CrawlConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Effective settings after applying builder overrides to the configuration
    fn settings(&self) -> (CrawlConfig, usize, Duration) {
        let mut config = self.config.clone();
        config.apply_env_overrides();
        if let Some(webdriver_url) = &self.webdriver_url {
            config.renderer.webdriver_url = webdriver_url.clone();
        }

        let max_links = self.max_links.unwrap_or(config.analyzer.max_links);
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(config.renderer.timeout_secs));
        (config, max_links, timeout)
    }

    /// Checks the target URL before any collaborator is contacted
    fn target(&self) -> Result<Url, CrawlError> {
        let url = Url::parse(self.url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CrawlError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Run the crawl against a WebDriver and, when an API key is available, a model
    pub async fn run(self) -> Result<CrawlReport, CrawlError> {
        let url = self.target()?;
        let (config, max_links, timeout) = self.settings();

        let extractor = Extractor::new(config.extractor.clone())?;
        let analyzer = match config.llm.resolve_api_key() {
            Some(_) => {
                let client = OpenAiCompatClient::from_config(&config.llm)
                    .map_err(|e| CrawlError::Config(e.to_string()))?;
                ::log::info!("Using model {} at {}", config.llm.model, client.base_url());
                LinkAnalyzer::new(Arc::new(client), config.analyzer.clone())
            }
            None => {
                ::log::warn!(
                    "No API key in {}; ranking links with text matching only",
                    config.llm.api_key_env
                );
                LinkAnalyzer::text_only(config.analyzer.clone())
            }
        };
        let renderer = WebDriverRenderer::from_config(&config.renderer);

        ::log::info!(
            "Crawling {} for query: {} (WebDriver at {})",
            url,
            self.query,
            renderer.webdriver_url()
        );
        run_pipeline(
            &renderer,
            &extractor,
            &analyzer,
            &url,
            &self.query,
            max_links,
            timeout,
        )
        .await
    }
}

use crate::filter::UrlFilterConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the page renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Upper bound for rendering one page, in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            timeout_secs: default_render_timeout_secs(),
        }
    }
}

/// Configuration for link and text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum characters of page text kept for analysis
    #[serde(default = "default_page_text_cap")]
    pub page_text_cap: usize,

    /// Non-content link rules
    #[serde(default)]
    pub filter: UrlFilterConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            page_text_cap: default_page_text_cap(),
            filter: UrlFilterConfig::default(),
        }
    }
}

/// Thresholds and limits for relevance analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Number of links considered when the caller does not say
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Model-scored links below this are dropped
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Text matching keeps links scoring above this
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: f64,

    /// Text matching threshold used for short queries
    #[serde(default = "default_short_query_threshold")]
    pub short_query_threshold: f64,

    /// Queries with at most this many words count as short
    #[serde(default = "default_short_query_words")]
    pub short_query_words: usize,

    /// Characters of page text quoted in the prompt
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Most links the model is asked to return
    #[serde(default = "default_max_returned_links")]
    pub max_returned_links: usize,

    /// Word limit for each link's reasoning
    #[serde(default = "default_reasoning_words")]
    pub reasoning_words: usize,

    /// Completion token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for the completion
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_links: default_max_links(),
            min_score: default_min_score(),
            fallback_threshold: default_fallback_threshold(),
            short_query_threshold: default_short_query_threshold(),
            short_query_words: default_short_query_words(),
            excerpt_chars: default_excerpt_chars(),
            max_returned_links: default_max_returned_links(),
            reasoning_words: default_reasoning_words(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Configuration for the OpenAI-compatible completion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL; `/v1/chat/completions` is appended
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key; read from `api_key_env` when absent
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// HTTP timeout for one completion, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// The configured key, falling back to the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Complete configuration for a crawl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlConfig {
    #[serde(default)]
    pub renderer: RendererConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl CrawlConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Applies the `WEBDRIVER_URL` environment override
    pub fn apply_env_overrides(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.renderer.webdriver_url = webdriver_url;
            }
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_render_timeout_secs() -> u64 {
    30
}

fn default_page_text_cap() -> usize {
    crate::parsers::text::DEFAULT_PAGE_TEXT_CAP
}

fn default_max_links() -> usize {
    20
}

fn default_min_score() -> f64 {
    0.2
}

fn default_fallback_threshold() -> f64 {
    0.1
}

fn default_short_query_threshold() -> f64 {
    0.05
}

fn default_short_query_words() -> usize {
    2
}

fn default_excerpt_chars() -> usize {
    500
}

fn default_max_returned_links() -> usize {
    15
}

fn default_reasoning_words() -> usize {
    50
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.1
}

fn default_llm_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CrawlConfig::from_json("{}").unwrap();

        assert_eq!(config.renderer.webdriver_url, "http://localhost:4444");
        assert_eq!(config.renderer.timeout_secs, 30);
        assert_eq!(config.extractor.page_text_cap, 3000);
        assert!(!config.extractor.filter.rules.is_empty());
        assert_eq!(config.analyzer.max_links, 20);
        assert_eq!(config.analyzer.min_score, 0.2);
        assert_eq!(config.analyzer.fallback_threshold, 0.1);
        assert_eq!(config.analyzer.short_query_threshold, 0.05);
        assert_eq!(config.analyzer.short_query_words, 2);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let json = r#"{
            "analyzer": { "max_links": 5, "temperature": 0.0 },
            "llm": { "model": "local-model", "api_key": "sk-test" }
        }"#;
        let config = CrawlConfig::from_json(json).unwrap();

        assert_eq!(config.analyzer.max_links, 5);
        assert_eq!(config.analyzer.temperature, 0.0);
        assert_eq!(config.analyzer.min_score, 0.2);
        assert_eq!(config.llm.model, "local-model");
        assert_eq!(config.llm.resolve_api_key().as_deref(), Some("sk-test"));
        assert_eq!(config.llm.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = CrawlConfig::default();
        config.llm.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CrawlConfig::from_json("{ not json").is_err());
    }
}

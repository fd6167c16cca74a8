use crate::parsers::RawPage;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// A page as produced by a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// URL after redirects; links are resolved against it
    pub final_url: Url,
    /// Title reported by the renderer (if any)
    pub title: Option<String>,
    /// HTTP-like status of the final response
    pub status: u16,
    /// Markup, or markdown plus pre-discovered links
    pub content: RawPage,
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rendering failed: {0}")]
    Failed(String),
}

/// Renders a page by URL
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders `url`, giving up after `timeout`
    async fn render(&self, url: &Url, timeout: Duration) -> Result<RenderedPage, RenderError>;
}

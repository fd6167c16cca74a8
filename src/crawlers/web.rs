use crate::config::RendererConfig;
use crate::crawlers::crawler::{PageRenderer, RenderError, RenderedPage};
use crate::parsers::RawPage;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Common WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Renders pages through a WebDriver server (e.g. ChromeDriver or geckodriver)
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    webdriver_url: String,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config.webdriver_url.clone())
    }

    pub fn webdriver_url(&self) -> &str {
        &self.webdriver_url
    }

    /// Connects to the configured WebDriver, then to the common fallbacks
    async fn connect(&self) -> Result<Client, RenderError> {
        match ClientBuilder::native().connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        Err(RenderError::Failed(format!(
            "could not connect to any WebDriver server (tried {}); \
             make sure one is running or set WEBDRIVER_URL",
            self.webdriver_url
        )))
    }

    /// Navigates and reads back the rendered page
    async fn load(client: &Client, url: &Url) -> Result<RenderedPage, RenderError> {
        client
            .goto(url.as_str())
            .await
            .map_err(|e| navigation_error(e, "accessing", url))?;

        let html = client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", url))?;

        let final_url = client.current_url().await.unwrap_or_else(|e| {
            ::log::warn!("Could not read final URL for {}: {}", url, e);
            url.clone()
        });

        let title = client
            .title()
            .await
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        // WebDriver does not expose the response status; a loaded page counts as 200.
        // Sources without markup go through the text parser
        Ok(RenderedPage {
            final_url,
            title,
            status: 200,
            content: RawPage::detect(html),
        })
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &Url, limit: Duration) -> Result<RenderedPage, RenderError> {
        let started = std::time::Instant::now();
        ::log::debug!("RENDER: {}", url);

        // The limit covers connecting (including fallbacks) as well as loading
        let mut session: Option<Client> = None;
        let attempt = async {
            let client = session.insert(self.connect().await?);
            Self::load(client, url).await
        };
        let result = match timeout(limit, attempt).await {
            Ok(result) => result,
            Err(_) => {
                ::log::error!("Timeout rendering: {}", url);
                Err(RenderError::Timeout(limit))
            }
        };

        if let Some(client) = session {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }

        if result.is_ok() {
            ::log::debug!(
                "Rendered {} in {:.2} seconds",
                url,
                started.elapsed().as_secs_f64()
            );
        }
        result
    }
}

/// Converts a WebDriver command error into a render failure
fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &Url) -> RenderError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
    RenderError::Failed(format!("{} {}: {}", context, url, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = RendererConfig {
            webdriver_url: "http://localhost:9515".to_string(),
            ..RendererConfig::default()
        };
        let renderer = WebDriverRenderer::from_config(&config);
        assert_eq!(renderer.webdriver_url(), "http://localhost:9515");
    }

    #[tokio::test]
    async fn test_limit_covers_connecting() {
        // Nothing can connect within a zero limit, so this never reaches a WebDriver
        let renderer = WebDriverRenderer::new("http://127.0.0.1:9");
        let url = Url::parse("https://example.com/").unwrap();

        let result = renderer.render(&url, Duration::ZERO).await;
        assert!(matches!(result, Err(RenderError::Timeout(d)) if d == Duration::ZERO));
    }
}

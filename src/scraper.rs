use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://preremates.cl/content/proximos-remates?page=all";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The listing page rejects non-browser agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Empty response from {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_url(DEFAULT_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_url(url: &str, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single GET of the listing page. No retries.
    pub async fn fetch_listing(&self) -> Result<String, ScraperError> {
        log::info!("Fetching auction listing from {}...", self.url);

        let html = self
            .client
            .get(&self.url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        if html.trim().is_empty() {
            return Err(ScraperError::EmptyResponse(self.url.clone()));
        }

        Ok(html)
    }
}

//! Fetcher: one GET of the site homepage, returned as text.

use crate::site::SiteProfile;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use storyline_common::{Result, StorylineError};
use storyline_http::{HttpClient, HttpError, RequestOpts};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Source of the raw homepage document.
#[async_trait]
pub trait StoryFetcher: Send + Sync {
    async fn fetch_document(&self) -> Result<String>;
}

/// Fetches the homepage over HTTP with browser-like headers. No retries.
#[derive(Clone)]
pub struct HttpFetcher {
    client: HttpClient,
    headers: HeaderMap,
}

impl HttpFetcher {
    pub fn new(site: &SiteProfile, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = HttpClient::new(site.base_url().as_str())
            .map_err(|e| StorylineError::Config(e.to_string()))?
            .with_timeout(timeout);

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| StorylineError::Config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        Ok(Self { client, headers })
    }
}

fn fetch_error(err: HttpError) -> StorylineError {
    match err {
        HttpError::Timeout(after) => StorylineError::Timeout(after),
        other => StorylineError::Network(other.to_string()),
    }
}

#[async_trait]
impl StoryFetcher for HttpFetcher {
    async fn fetch_document(&self) -> Result<String> {
        let opts = RequestOpts {
            headers: Some(self.headers.clone()),
            ..Default::default()
        };
        let page = self.client.get_text("", opts).await.map_err(fetch_error)?;
        tracing::info!(
            status = %page.status,
            html_len = page.body.len(),
            duration_ms = page.elapsed.as_millis() as u64,
            "fetch.document"
        );
        Ok(page.body)
    }
}

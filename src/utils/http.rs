// src/utils/http.rs

//! HTTP fetch client.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Fallback identification used when the configured pool is empty.
const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; careerwatch/0.1)";

/// Capability to retrieve a raw document.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .default_headers(default_headers())
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers
}

/// Fetch client that rotates its User-Agent on every request.
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    /// Build a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let user_agents = config
            .user_agents
            .iter()
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty())
            .collect();

        Ok(Self {
            client: create_async_client(config)?,
            user_agents,
        })
    }

    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_USER_AGENT)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.pick_user_agent())
            .send()
            .await
            .map_err(|e| AppError::network(url, e))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(AppError::network(url, format!("unexpected status {status}")));
        }

        response.text().await.map_err(|e| AppError::network(url, e))
    }
}

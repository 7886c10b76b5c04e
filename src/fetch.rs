use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA,
    UPGRADE_INSECURE_REQUESTS,
};
use url::Url;

use crate::error::ItemError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/81.0.4044.138 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// A fetched HTML page and the URL it was served from after redirects.
#[derive(Debug)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;

        Ok(Self { client, options })
    }

    /// GETs `url`, retrying transient failures up to the configured number of times.
    pub async fn fetch(&self, url: &Url) -> Result<Page, ItemError> {
        let mut attempt = 0_u32;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(err) if err.is_retryable() && attempt < self.options.retries => {
                    attempt += 1;
                    let delay = self.options.retry_delay.saturating_mul(attempt);
                    tracing::warn!(%url, attempt, ?delay, err = %err, "fetch failed; retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<Page, ItemError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ItemError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ItemError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| ItemError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(Page {
            url: final_url,
            body,
        })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

pub fn parse_http_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid url: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("url must be http/https: {url}");
    }
    Ok(url)
}

/// Scheme, host and port of `url` as a base for site-relative links.
pub fn origin_of(url: &Url) -> anyhow::Result<Url> {
    let origin = url.origin();
    if !origin.is_tuple() {
        anyhow::bail!("url has no origin: {url}");
    }
    let base = format!("{}/", origin.ascii_serialization());
    Url::parse(&base).with_context(|| format!("parse origin: {base}"))
}

/// Resolves a listing link against the page origin.
///
/// `/path` becomes `origin + /path`; absolute links are kept as they are.
pub fn resolve_link(origin: &Url, link: &str) -> Option<Url> {
    origin.join(link).ok()
}

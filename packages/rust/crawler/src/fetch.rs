//! Page transport: fetching a URL and returning its markup.
//!
//! The pipeline only ever needs `fetch(url) -> markup | failure`, so the
//! transport sits behind the [`Fetcher`] trait. [`HttpFetcher`] is the
//! production implementation; tests substitute in-memory fetchers.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use partcatalog_shared::{PartCatalogError, Result, ScrapeConfig};

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("PartCatalog/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects followed per request.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Capability to fetch one page's markup.
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP fetcher backed by `reqwest`.
///
/// Requests are never retried. A non-success status is a failure.
pub struct HttpFetcher {
    client: Client,
    rate_limit: Duration,
}

impl HttpFetcher {
    /// Build a fetcher from the runtime scrape configuration.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| PartCatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            rate_limit: config.rate_limit,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        if !self.rate_limit.is_zero() {
            tokio::time::sleep(self.rate_limit).await;
        }

        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| PartCatalogError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PartCatalogError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| PartCatalogError::Network(format!("{url}: body read failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Link resolution
// ---------------------------------------------------------------------------

/// Resolve a discovered `href` against the catalog origin.
///
/// Only http(s) links on the same origin as `base` are accepted.
pub fn resolve_link(base: &Url, href: &str) -> Result<Url> {
    let href = href.trim();
    if href.is_empty() {
        return Err(PartCatalogError::validation("empty link"));
    }

    let resolved = base
        .join(href)
        .map_err(|e| PartCatalogError::validation(format!("invalid link '{href}': {e}")))?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return Err(PartCatalogError::validation(format!(
            "unsupported scheme in link '{resolved}'"
        )));
    }

    if resolved.origin() != base.origin() {
        return Err(PartCatalogError::validation(format!(
            "link '{resolved}' leaves the catalog origin {}",
            base.origin().ascii_serialization()
        )));
    }

    Ok(resolved)
}

// External page retrieval over HTTP(S), optionally through a forwarding proxy.

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{build_http_client, PageFetcher, RemoteFuture};
use crate::config::NotemakerConfig;
use crate::error::RemoteError;

#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    http: Client,
    proxy_url: Option<String>,
}

impl HttpPageFetcher {
    pub fn new(config: &NotemakerConfig) -> Result<Self, RemoteError> {
        Ok(Self {
            http: build_http_client(config.request_timeout_secs)?,
            proxy_url: config.proxy_url.clone(),
        })
    }

    /// The URL actually requested: the page URL, prefixed by the proxy if set.
    pub fn target_url(&self, url: &str) -> Result<Url, RemoteError> {
        let page = Url::parse(url.trim()).map_err(|_| RemoteError::InvalidUrl(url.to_string()))?;
        if !matches!(page.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidUrl(url.to_string()));
        }

        match &self.proxy_url {
            Some(proxy) => {
                let proxied = format!("{proxy}{page}");
                Url::parse(&proxied).map_err(|_| RemoteError::InvalidUrl(proxied))
            }
            None => Ok(page),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, RemoteError> {
        let target = self.target_url(url)?;
        debug!(%target, "fetching page");

        let response = self
            .http
            .get(target)
            .send()
            .await
            .map_err(|error| RemoteError::Transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| RemoteError::Malformed(error.to_string()))?;

        if !status.is_success() {
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                text => text.to_string(),
            };
            return Err(RemoteError::Status { status: status.as_u16(), message });
        }

        Ok(body)
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> RemoteFuture<'a, String> {
        Box::pin(self.fetch_page(url))
    }
}

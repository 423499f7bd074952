use anyhow::{Result, Context};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::HttpSettings;
use crate::core::link_header::{parse_link_header, LinkValue};

/// Headers-only view of a resource, as returned by a HEAD request.
#[derive(Debug, Clone, Default)]
pub struct ProbeResponse {
    pub links: Vec<LinkValue>,
}

impl ProbeResponse {
    pub fn has_relation(&self, relation: &str) -> bool {
        self.links.iter().any(|link| link.has_relation(relation))
    }
}

#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub uri: String,
    pub body: String,
}

/// Transport used to look at repository resources.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Metadata-only request; no body is transferred.
    async fn probe(&self, uri: &str) -> Result<ProbeResponse>;

    /// Full retrieval of the resource's RDF representation.
    async fn fetch(&self, uri: &str) -> Result<FetchedResource>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_str(&settings.accept)
                .with_context(|| format!("Invalid Accept header: {}", settings.accept))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn probe(&self, uri: &str) -> Result<ProbeResponse> {
        debug!("HEAD {}", uri);
        let response = self.client
            .head(uri)
            .send()
            .await
            .with_context(|| format!("HEAD request failed: {}", uri))?
            .error_for_status()
            .with_context(|| format!("HEAD request returned error status: {}", uri))?;

        let links = response
            .headers()
            .get_all(reqwest::header::LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(parse_link_header)
            .collect();

        Ok(ProbeResponse { links })
    }

    async fn fetch(&self, uri: &str) -> Result<FetchedResource> {
        debug!("GET {}", uri);
        let response = self.client
            .get(uri)
            .send()
            .await
            .with_context(|| format!("GET request failed: {}", uri))?
            .error_for_status()
            .with_context(|| format!("GET request returned error status: {}", uri))?;

        let body = response.text().await
            .with_context(|| format!("Failed to read response body: {}", uri))?;

        Ok(FetchedResource {
            uri: uri.to_string(),
            body,
        })
    }
}

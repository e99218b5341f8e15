//! Availability endpoint client
//!
//! Asks the archive whether it holds a snapshot of a URL. The endpoint answers
//! with JSON shaped like:
//!
//! ```json
//! { "archived_snapshots": { "closest": { "available": true, "url": "http://web.archive.org/web/2024/https://example.org/" } } }
//! ```
//!
//! An empty `archived_snapshots` object means the URL is not indexed yet.

use crate::{ArchiveError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// One availability query against the archive
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    /// Returns the snapshot link if the archive has one
    ///
    /// * `Ok(Some(link))` - A snapshot exists; the link is HTTPS
    /// * `Ok(None)` - Well-formed answer, no snapshot yet
    /// * `Err(ArchiveError)` - Transport or protocol failure for this attempt
    async fn check(&self, url: &Url) -> Result<Option<String>>;
}

#[derive(Debug, Default, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<Snapshot>,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    available: bool,
    url: Option<String>,
}

/// Reqwest-backed client for the availability endpoint
pub struct AvailabilityClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl AvailabilityClient {
    /// Creates a client for the given endpoint
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `endpoint` - Availability endpoint, e.g. `https://archive.org/wayback/available`
    /// * `timeout` - Timeout for each query
    pub fn new(client: Client, endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            timeout,
        })
    }

    /// Builds the query URL: `<endpoint>?url=<encoded target>`
    pub fn query_url(&self, target: &Url) -> Url {
        let mut query = self.endpoint.clone();
        query.query_pairs_mut().append_pair("url", target.as_str());
        query
    }
}

#[async_trait]
impl AvailabilityCheck for AvailabilityClient {
    async fn check(&self, url: &Url) -> Result<Option<String>> {
        let query = self.query_url(url);

        let response = self
            .client
            .get(query)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::Protocol {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await.map_err(|e| transport_error(url, e))?;
        parse_availability(url, &body)
    }
}

/// Extracts the snapshot link from an availability response body
fn parse_availability(url: &Url, body: &str) -> Result<Option<String>> {
    let parsed: AvailabilityResponse =
        serde_json::from_str(body).map_err(|e| ArchiveError::Protocol {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    Ok(parsed
        .archived_snapshots
        .closest
        .filter(|snapshot| snapshot.available)
        .and_then(|snapshot| snapshot.url)
        .filter(|link| !link.is_empty())
        .map(|link| upgrade_to_https(&link)))
}

/// Rewrites a leading `http://` to `https://`
pub fn upgrade_to_https(link: &str) -> String {
    match link.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => link.to_string(),
    }
}

fn transport_error(url: &Url, error: reqwest::Error) -> ArchiveError {
    if error.is_timeout() {
        ArchiveError::Timeout {
            url: url.to_string(),
        }
    } else {
        ArchiveError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

//! Archive submitter
//!
//! Fires a "capture this URL" request at the archive's save endpoint, trying a
//! chain of transports in order. The only result is whether some transport got
//! the request out; nothing about the response is inspected.

use crate::archive::transport::SaveTransport;
use crate::{ArchiveError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Capability to request a capture of a URL
#[async_trait]
pub trait Submit: Send + Sync {
    /// Returns true if the capture request was dispatched
    ///
    /// Dispatch is not confirmation: the archive may still drop the request.
    /// Never fails outward; transport errors only show up as `false`.
    async fn submit(&self, url: &Url) -> bool;
}

/// Submitter that walks a primary/fallback chain of transports
pub struct Submitter {
    save_endpoint: String,
    timeout: Duration,
    transports: Vec<Arc<dyn SaveTransport>>,
}

impl Submitter {
    /// Creates a submitter with a primary and a fallback transport
    ///
    /// # Arguments
    ///
    /// * `save_endpoint` - Base of the capture endpoint, e.g. `https://web.archive.org/save`
    /// * `timeout` - Timeout applied to each transport attempt
    /// * `primary` - Transport tried first
    /// * `fallback` - Transport tried when the primary fails
    pub fn new(
        save_endpoint: impl Into<String>,
        timeout: Duration,
        primary: Arc<dyn SaveTransport>,
        fallback: Arc<dyn SaveTransport>,
    ) -> Self {
        Self::with_transports(save_endpoint, timeout, vec![primary, fallback])
    }

    /// Creates a submitter with an arbitrary transport chain
    pub fn with_transports(
        save_endpoint: impl Into<String>,
        timeout: Duration,
        transports: Vec<Arc<dyn SaveTransport>>,
    ) -> Self {
        Self {
            save_endpoint: save_endpoint.into(),
            timeout,
            transports,
        }
    }

    /// Builds the capture URL: `<save-endpoint>/<percent-encoded target>`
    ///
    /// # Example
    ///
    /// ```
    /// use archivelinks::archive::Submitter;
    /// use std::time::Duration;
    /// use url::Url;
    ///
    /// let submitter = Submitter::with_transports("https://web.archive.org/save/", Duration::from_secs(1), vec![]);
    /// let target = Url::parse("https://example.org/paper").unwrap();
    /// assert_eq!(
    ///     submitter.capture_url(&target).unwrap().as_str(),
    ///     "https://web.archive.org/save/https%3A%2F%2Fexample.org%2Fpaper"
    /// );
    /// ```
    pub fn capture_url(&self, target: &Url) -> Result<Url> {
        let encoded: String = byte_serialize(target.as_str().as_bytes()).collect();
        let endpoint = format!("{}/{}", self.save_endpoint.trim_end_matches('/'), encoded);
        Url::parse(&endpoint).map_err(ArchiveError::from)
    }
}

#[async_trait]
impl Submit for Submitter {
    async fn submit(&self, url: &Url) -> bool {
        let endpoint = match self.capture_url(url) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::warn!("Cannot build capture request for {}: {}", url, e);
                return false;
            }
        };

        for transport in &self.transports {
            match transport.dispatch(&endpoint, self.timeout).await {
                Ok(()) => {
                    tracing::debug!("Capture of {} dispatched via {}", url, transport.name());
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        "Capture of {} via {} transport failed: {}",
                        url,
                        transport.name(),
                        e
                    );
                }
            }
        }

        false
    }
}

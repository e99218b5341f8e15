//! Capture transports
//!
//! A transport fires one capture request and reports only whether the request
//! completed. Responses from the capture endpoint are never read: a page
//! being accepted for capture says nothing about whether a snapshot will exist,
//! so confirmation is left to the availability poller.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use url::Url;

/// Why a capture request did not complete
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("completion signal lost")]
    SignalLost,
}

/// Something that can deliver a capture request to the archive
#[async_trait]
pub trait SaveTransport: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Sends a request to `endpoint`, giving up after `timeout`
    ///
    /// Returns `Ok(())` once the request completed at the transport level,
    /// whatever the response status was.
    async fn dispatch(&self, endpoint: &Url, timeout: Duration) -> Result<(), TransportError>;
}

/// Primary transport: a plain GET whose response is dropped unread
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SaveTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn dispatch(&self, endpoint: &Url, timeout: Duration) -> Result<(), TransportError> {
        let response = self
            .client
            .get(endpoint.clone())
            .header(CACHE_CONTROL, "no-store")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        tracing::trace!(
            "Capture request to {} completed (HTTP {})",
            endpoint,
            response.status().as_u16()
        );
        Ok(())
    }
}

/// Fallback transport: fire-and-forget request observed through a completion signal
///
/// The request runs on its own task and reports back over a oneshot channel
/// carrying nothing but success or failure. If the signal does not arrive
/// within the timeout the request task is aborted.
pub struct BeaconTransport {
    client: Client,
}

impl BeaconTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SaveTransport for BeaconTransport {
    fn name(&self) -> &'static str {
        "beacon"
    }

    async fn dispatch(&self, endpoint: &Url, timeout: Duration) -> Result<(), TransportError> {
        let (tx, rx) = oneshot::channel();
        let request = self
            .client
            .get(endpoint.clone())
            .header(ACCEPT, "image/*")
            .header(CACHE_CONTROL, "no-store");

        let task = tokio::spawn(async move {
            let signal = request
                .send()
                .await
                .map(|_| ())
                .map_err(|e| classify(e, timeout));
            let _ = tx.send(signal);
        });

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(signal)) => signal,
            Ok(Err(_)) => Err(TransportError::SignalLost),
            Err(_) => {
                task.abort();
                Err(TransportError::Timeout(timeout))
            }
        }
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Network(error.to_string())
    }
}

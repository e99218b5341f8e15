//! Preservation orchestrator
//!
//! Combines one capture request and one polling session into a single verdict
//! per URL. Nothing escapes this boundary: every failure, including a panic in
//! a collaborator, ends up as a status.

use crate::archive::poller::{PollOutcome, Poller};
use crate::archive::submitter::Submit;
use crate::state::ItemStatus;
use async_trait::async_trait;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Final verdict for one URL in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Archived; carries the HTTPS snapshot link
    Saved(String),
    /// Capture dispatched, but no snapshot within the attempt budget
    NotYetIndexed,
    /// Polling deadline elapsed
    TimedOut,
    /// Capture could not be dispatched and no snapshot was found
    SaveRequestFailed,
}

impl Outcome {
    /// Applies the decision table, in priority order:
    ///
    /// 1. Snapshot found → `Saved`
    /// 2. Deadline passed → `TimedOut`
    /// 3. Dispatched → `NotYetIndexed`
    /// 4. Otherwise → `SaveRequestFailed`
    pub fn decide(dispatched: bool, polled: PollOutcome) -> Self {
        match polled {
            PollOutcome::Found(link) => Self::Saved(link),
            PollOutcome::TimedOut => Self::TimedOut,
            PollOutcome::NotFound if dispatched => Self::NotYetIndexed,
            PollOutcome::NotFound => Self::SaveRequestFailed,
        }
    }

    pub fn status(&self) -> ItemStatus {
        match self {
            Self::Saved(_) => ItemStatus::Saved,
            Self::NotYetIndexed => ItemStatus::NotYetIndexed,
            Self::TimedOut => ItemStatus::TimedOut,
            Self::SaveRequestFailed => ItemStatus::SaveRequestFailed,
        }
    }

    pub fn archived_url(&self) -> Option<&str> {
        match self {
            Self::Saved(link) => Some(link),
            _ => None,
        }
    }

    pub fn into_archived_url(self) -> Option<String> {
        match self {
            Self::Saved(link) => Some(link),
            _ => None,
        }
    }
}

/// Capability to take one URL through the whole preservation pipeline
#[async_trait]
pub trait Preserve: Send + Sync {
    async fn preserve(&self, url: &Url) -> Outcome;
}

/// Submits a capture, then polls for the snapshot
pub struct Preserver {
    submitter: Arc<dyn Submit>,
    poller: Poller,
    deadline: Duration,
}

impl Preserver {
    /// Creates a preserver
    ///
    /// # Arguments
    ///
    /// * `submitter` - Sends the capture request
    /// * `poller` - Confirms the snapshot
    /// * `deadline` - Wall-clock polling budget per URL
    pub fn new(submitter: Arc<dyn Submit>, poller: Poller, deadline: Duration) -> Self {
        Self {
            submitter,
            poller,
            deadline,
        }
    }

    async fn run_pipeline(&self, url: &Url) -> Outcome {
        let dispatched = self.submitter.submit(url).await;
        if !dispatched {
            tracing::info!("Capture request for {} not sent; checking the archive anyway", url);
        }

        // Poll even without a dispatch: the service may have processed it anyway
        let polled = self.poller.poll(url, self.deadline).await;
        Outcome::decide(dispatched, polled)
    }
}

#[async_trait]
impl Preserve for Preserver {
    async fn preserve(&self, url: &Url) -> Outcome {
        match AssertUnwindSafe(self.run_pipeline(url)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!("Preservation of {} aborted unexpectedly", url);
                Outcome::SaveRequestFailed
            }
        }
    }
}

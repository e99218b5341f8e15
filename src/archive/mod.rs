//! Archive module: the concurrent preservation pipeline
//!
//! This module contains the core archiving logic, including:
//! - Capture requests with a primary/fallback transport chain
//! - Availability polling with an attempt budget and a wall-clock deadline
//! - Per-URL orchestration into a single terminal status
//! - A bounded, staggered worker pool and progress reporting

mod availability;
mod client;
mod orchestrator;
mod poller;
mod progress;
mod scheduler;
mod submitter;
mod transport;

pub use availability::{upgrade_to_https, AvailabilityCheck, AvailabilityClient};
pub use client::{build_beacon_client, build_http_client};
pub use orchestrator::{Outcome, Preserve, Preserver};
pub use poller::{PollOutcome, Poller};
pub use progress::{
    percent_complete, ChannelProgressSink, ProgressEvent, ProgressSink, TracingProgressSink,
};
pub use scheduler::{RunPermit, RunReport, Scheduler};
pub use submitter::{Submit, Submitter};
pub use transport::{BeaconTransport, HttpTransport, SaveTransport, TransportError};

use crate::config::Config;
use crate::output::RunSummary;
use crate::state::{LinkSet, RunKind};
use crate::Result;
use std::sync::Arc;

/// Wires the live pipeline from configuration
///
/// Builds the HTTP clients, the submit transport chain (plain request first,
/// beacon-style request as fallback), the availability client and poller, and
/// hands the resulting preserver to a scheduler.
pub fn build_scheduler(config: &Config) -> Result<Scheduler> {
    let archive = &config.archive;

    let http_client = build_http_client(&config.user_agent)?;
    let beacon_client = build_beacon_client(&config.user_agent)?;

    let submitter = Submitter::new(
        archive.save_endpoint.clone(),
        archive.submit_timeout(),
        Arc::new(HttpTransport::new(http_client.clone())),
        Arc::new(BeaconTransport::new(beacon_client)),
    );

    let availability = AvailabilityClient::new(
        http_client,
        &archive.availability_endpoint,
        archive.availability_timeout(),
    )?;
    let poller = Poller::new(
        Arc::new(availability),
        archive.poll_attempts,
        archive.poll_delay(),
    );

    let preserver = Preserver::new(Arc::new(submitter), poller, archive.preserve_deadline());

    Ok(Scheduler::new(Arc::new(preserver), config.scheduler.clone()))
}

/// Runs one archive pass over a link set
///
/// # Arguments
///
/// * `links` - The session's links; targeted items are updated in place
/// * `kind` - Full run or retry of unresolved links
/// * `scheduler` - The worker pool to run on
/// * `progress` - Receives progress events
///
/// # Returns
///
/// * `Ok((RunReport, RunSummary))` - The run completed; the summary covers every included link
/// * `Err(ArchiveError::RunInProgress)` - The scheduler is busy with another run
pub async fn archive_links(
    links: &mut LinkSet,
    kind: RunKind,
    scheduler: &Scheduler,
    progress: &dyn ProgressSink,
) -> Result<(RunReport, RunSummary)> {
    // Reserve the scheduler before resetting any item
    let permit = scheduler.try_begin()?;

    let targets = links.prepare_run(kind);
    tracing::info!("{}: {} link(s)", kind.label(), targets.len());

    let report = permit.run(targets, progress).await;
    let summary = RunSummary::from_links(links);

    tracing::info!("{}", summary.message());
    Ok((report, summary))
}

//! Progress reporting for archive runs

use crate::state::{ItemId, ItemStatus};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Something observable happened during a run
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The run claimed its items and is starting its workers
    RunStarted { total: usize, workers: usize },

    /// A worker claimed an item and set it to `saving`
    ItemStarted {
        worker: usize,
        id: ItemId,
        url: String,
    },

    /// An item reached its final status for this run
    ItemFinished {
        id: ItemId,
        url: String,
        status: ItemStatus,
        completed: usize,
        total: usize,
        percent: u8,
    },

    /// Every worker has drained the queue
    RunFinished { total: usize, elapsed: Duration },
}

/// Receives progress events from the scheduler
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Writes progress to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { total, workers } => {
                tracing::info!("Archiving {} link(s), {} at a time", total, workers);
            }
            ProgressEvent::ItemStarted { worker, url, .. } => {
                tracing::debug!("Worker {} archiving {}", worker, url);
            }
            ProgressEvent::ItemFinished {
                url,
                status,
                completed,
                total,
                percent,
                ..
            } => {
                tracing::info!(
                    "Archiving {}/{} complete ({}%): {} {}",
                    completed,
                    total,
                    percent,
                    status.label(),
                    url
                );
            }
            ProgressEvent::RunFinished { total, elapsed } => {
                tracing::info!("Processed {} link(s) in {:.1?}", total, elapsed);
            }
        }
    }
}

/// Forwards progress events over a channel
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }
}

/// Rounded completion percentage
pub fn percent_complete(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

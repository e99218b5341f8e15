//! Scheduler for running the preservation pipeline over a set of links
//!
//! This module handles:
//! - A bounded pool of cooperative workers sharing one claim cursor
//! - Staggered worker startup, so the archive is not hit with a burst
//! - Writing each verdict back to its item and publishing progress
//! - Refusing to start a run while another one is active

use crate::archive::orchestrator::Preserve;
use crate::archive::progress::{percent_complete, ProgressEvent, ProgressSink};
use crate::config::SchedulerConfig;
use crate::state::PreservationItem;
use crate::{ArchiveError, Result};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// What a finished run did
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of items processed
    pub processed: usize,

    /// Number of workers used
    pub workers: usize,

    /// Wall-clock start and end, for the run log
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    pub elapsed: Duration,
}

/// An item slot in the run's queue
///
/// Only the worker that claimed the index ever locks it, so the lock is never
/// contended; it exists to hand out `&mut` access through a shared slice.
type Slot<'a> = Mutex<&'a mut PreservationItem>;

/// Shared state of one run
struct RunQueue<'a> {
    slots: Vec<Slot<'a>>,
    cursor: AtomicUsize,
    completed: AtomicUsize,
}

impl<'a> RunQueue<'a> {
    /// Claims the next unclaimed slot
    fn claim(&self) -> Option<&Slot<'a>> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.slots.get(index)
    }

    fn total(&self) -> usize {
        self.slots.len()
    }
}

/// Scheduler runs the preservation pipeline across a bounded worker pool
///
/// Workers are futures multiplexed on the caller's task; they only yield at
/// network calls and timers. Each worker claims the next index from a shared
/// atomic cursor before touching an item, so every item is processed by
/// exactly one worker and none is skipped.
pub struct Scheduler {
    preserver: Arc<dyn Preserve>,
    config: SchedulerConfig,
    active: AtomicBool,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// A worker limit of zero is raised to one, so a run always makes progress.
    ///
    /// # Arguments
    ///
    /// * `preserver` - Runs the pipeline for one URL
    /// * `config` - Worker count and stagger settings
    pub fn new(preserver: Arc<dyn Preserve>, mut config: SchedulerConfig) -> Self {
        if config.max_concurrent_saves == 0 {
            tracing::warn!("Worker limit of 0 requested, using 1");
            config.max_concurrent_saves = 1;
        }

        Self {
            preserver,
            config,
            active: AtomicBool::new(false),
        }
    }

    /// Maximum number of links archived at the same time
    pub fn worker_limit(&self) -> usize {
        self.config.max_concurrent_saves
    }

    /// Returns true while a run is in progress
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Reserves the scheduler for one run
    ///
    /// The reservation lasts until the returned permit is run or dropped.
    /// Callers that prepare items before running should take the permit first,
    /// so a rejected run leaves its items untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(RunPermit)` - The scheduler is reserved
    /// * `Err(ArchiveError::RunInProgress)` - Another run is active on this scheduler
    pub fn try_begin(&self) -> Result<RunPermit<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ArchiveError::RunInProgress)?;
        Ok(RunPermit { scheduler: self })
    }

    /// Processes every item once, mutating them in place
    ///
    /// Shorthand for [`Scheduler::try_begin`] followed by [`RunPermit::run`].
    pub async fn run(
        &self,
        items: Vec<&mut PreservationItem>,
        progress: &dyn ProgressSink,
    ) -> Result<RunReport> {
        Ok(self.try_begin()?.run(items, progress).await)
    }

    /// One worker's claim loop
    async fn worker(&self, index: usize, queue: &RunQueue<'_>, progress: &dyn ProgressSink) {
        if index > 0 {
            tokio::time::sleep(self.config.worker_stagger() * index as u32).await;
        }

        while let Some(slot) = queue.claim() {
            let (id, url) = {
                let mut item = lock(slot);
                item.mark_saving();
                (item.id(), item.original_url().clone())
            };

            progress.emit(ProgressEvent::ItemStarted {
                worker: index,
                id,
                url: url.to_string(),
            });

            let outcome = self.preserver.preserve(&url).await;
            let status = outcome.status();
            lock(slot).record_outcome(outcome);

            let completed = queue.completed.fetch_add(1, Ordering::SeqCst) + 1;
            progress.emit(ProgressEvent::ItemFinished {
                id,
                url: url.to_string(),
                status,
                completed,
                total: queue.total(),
                percent: percent_complete(completed, queue.total()),
            });
        }

        tracing::trace!("Worker {} found the queue empty", index);
    }
}

/// Exclusive right to run once on a scheduler
///
/// Releases the scheduler when dropped, however the run ends.
pub struct RunPermit<'s> {
    scheduler: &'s Scheduler,
}

impl RunPermit<'_> {
    /// Processes every item once, mutating them in place
    ///
    /// Each item is set to `saving` when claimed and to its verdict when done.
    /// Progress is published after every completion.
    pub async fn run(
        self,
        items: Vec<&mut PreservationItem>,
        progress: &dyn ProgressSink,
    ) -> RunReport {
        let scheduler = self.scheduler;
        let started_at = Utc::now();
        let clock = Instant::now();

        let queue = RunQueue {
            slots: items.into_iter().map(Mutex::new).collect(),
            cursor: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        };
        let workers = scheduler.worker_limit().min(queue.total());

        progress.emit(ProgressEvent::RunStarted {
            total: queue.total(),
            workers,
        });

        join_all((0..workers).map(|worker| scheduler.worker(worker, &queue, progress))).await;

        let elapsed = clock.elapsed();
        progress.emit(ProgressEvent::RunFinished {
            total: queue.total(),
            elapsed,
        });

        RunReport {
            processed: queue.completed.load(Ordering::SeqCst),
            workers,
            started_at,
            finished_at: Utc::now(),
            elapsed,
        }
    }
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.scheduler.active.store(false, Ordering::Release);
    }
}

fn lock<'g, 'a>(slot: &'g Slot<'a>) -> MutexGuard<'g, &'a mut PreservationItem> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Run aggregation
//!
//! This module summarizes a finished run over the included links and
//! computes the retry set for the next one.

use crate::state::{ItemId, ItemStatus, LinkSet, PreservationItem};

/// Counts of included links by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of included links
    pub included: usize,

    pub saved: usize,
    pub not_yet_indexed: usize,
    pub timed_out: usize,
    pub save_request_failed: usize,

    /// Links left out of runs (DOI or excluded by the user)
    pub skipped: usize,
}

impl RunSummary {
    /// Aggregates over every item of a link set
    pub fn from_links(links: &LinkSet) -> Self {
        Self::from_items(links.items())
    }

    /// Aggregates over a slice of items
    ///
    /// Excluded items only count towards `skipped`.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a PreservationItem>,
    {
        let mut summary = Self::default();

        for item in items {
            if !item.is_included() {
                summary.skipped += 1;
                continue;
            }

            summary.included += 1;
            match item.status() {
                ItemStatus::Saved => summary.saved += 1,
                ItemStatus::NotYetIndexed => summary.not_yet_indexed += 1,
                ItemStatus::TimedOut => summary.timed_out += 1,
                ItemStatus::SaveRequestFailed => summary.save_request_failed += 1,
                ItemStatus::Ready | ItemStatus::Saving | ItemStatus::Skipped => {}
            }
        }

        summary
    }

    /// Included links that did not end up saved
    pub fn unresolved(&self) -> usize {
        self.not_yet_indexed + self.timed_out + self.save_request_failed
    }

    /// Returns true if every included link is archived
    pub fn all_saved(&self) -> bool {
        self.saved == self.included
    }

    /// One-line summary of the run
    pub fn message(&self) -> String {
        let headline = format!(
            "Archive run finished. {}/{} included links archived.",
            self.saved, self.included
        );

        if self.unresolved() == 0 {
            return headline;
        }

        format!(
            "{} {} unresolved ({} timed out, {} failed, {} not yet indexed).",
            headline,
            self.unresolved(),
            self.timed_out,
            self.save_request_failed,
            self.not_yet_indexed
        )
    }
}

/// Ids of the links a retry run would process
pub fn retry_set(links: &LinkSet) -> Vec<ItemId> {
    links.retry_candidates().map(|item| item.id()).collect()
}

/// Prints the run summary and the unresolved links to stdout
pub fn print_summary(summary: &RunSummary, links: &LinkSet) {
    println!("=== Archive Summary ===\n");
    println!("{}", summary.message());
    println!();

    println!("Included links: {}", summary.included);
    println!("  Archived: {}", summary.saved);
    println!("  Not indexed yet: {}", summary.not_yet_indexed);
    println!("  Timed out: {}", summary.timed_out);
    println!("  Archive failed: {}", summary.save_request_failed);
    println!("Skipped links: {}", summary.skipped);

    let unresolved: Vec<_> = links.retry_candidates().collect();
    if !unresolved.is_empty() {
        println!();
        println!("Unresolved ({}):", unresolved.len());
        for item in unresolved {
            println!("  - [{}] {}", item.status().label(), item.original_url());
        }
    }
}

//! Item status definitions for tracking preservation progress
//!
//! This module defines all states a link can be in while it is being archived.

use std::fmt;

/// Represents the current state of a link in the preservation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    // ===== Active States =====
    /// Link is waiting for the next archive run
    Ready,

    /// A worker is submitting and polling this link
    Saving,

    // ===== Terminal Success States =====
    /// The archive holds a snapshot of this link
    Saved,

    // ===== Terminal Unresolved States =====
    /// The capture request went out but no snapshot showed up within the attempt budget
    NotYetIndexed,

    /// Polling gave up because the per-link deadline elapsed
    TimedOut,

    /// The capture request could not be sent and no snapshot was found
    SaveRequestFailed,

    // ===== Special States =====
    /// Link is excluded from archive runs
    Skipped,
}

impl ItemStatus {
    /// Returns true if this is an outcome the orchestrator can produce
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Saved | Self::NotYetIndexed | Self::TimedOut | Self::SaveRequestFailed
        )
    }

    /// Returns true if a run finished without archiving the link
    ///
    /// Unresolved links are the ones offered for retry.
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            Self::NotYetIndexed | Self::TimedOut | Self::SaveRequestFailed
        )
    }

    /// Converts the status to its export string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::NotYetIndexed => "not_yet_indexed",
            Self::TimedOut => "timed_out",
            Self::SaveRequestFailed => "save_request_failed",
            Self::Skipped => "skipped",
        }
    }

    /// Human-readable label, as shown next to a link in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "To Be Archived",
            Self::Saving => "Archiving",
            Self::Saved => "Archived",
            Self::NotYetIndexed => "Not Indexed Yet",
            Self::TimedOut => "Timed Out",
            Self::SaveRequestFailed => "Archive Failed",
            Self::Skipped => "Skipped",
        }
    }

}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

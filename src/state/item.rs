use crate::archive::Outcome;
use crate::state::ItemStatus;
use crate::url::is_doi_url;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Identifier of a link, unique for the lifetime of the process
pub type ItemId = u64;

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Where a link came from; provenance only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemSource {
    /// Found in the source document by the extractor
    Extracted,
    /// Typed in by the user
    Manual,
}

impl ItemSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Manual => "manual",
        }
    }
}

/// Why a link is excluded from archive runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// DOI links are persistent already and are skipped on ingestion
    Doi,
    /// The user excluded the link
    Manual,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One link under management
///
/// The archived link is present exactly when the status is [`ItemStatus::Saved`];
/// all mutation goes through methods that keep the two in step.
#[derive(Debug, Clone, PartialEq)]
pub struct PreservationItem {
    id: ItemId,
    original_url: Url,
    archived_url: Option<String>,
    status: ItemStatus,
    included: bool,
    skip_reason: Option<SkipReason>,
    source: ItemSource,
}

impl PreservationItem {
    /// Creates a new item for an already-normalized URL
    ///
    /// DOI links start out skipped and excluded.
    pub fn new(original_url: Url, source: ItemSource) -> Self {
        let doi = is_doi_url(&original_url);

        Self {
            id: NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed),
            original_url,
            archived_url: None,
            status: if doi {
                ItemStatus::Skipped
            } else {
                ItemStatus::Ready
            },
            included: !doi,
            skip_reason: doi.then_some(SkipReason::Doi),
            source,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn original_url(&self) -> &Url {
        &self.original_url
    }

    pub fn archived_url(&self) -> Option<&str> {
        self.archived_url.as_deref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_included(&self) -> bool {
        self.included
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        self.skip_reason
    }

    pub fn source(&self) -> ItemSource {
        self.source
    }

    /// Excludes the link from future runs
    pub(crate) fn exclude(&mut self) {
        self.included = false;
        self.skip_reason.get_or_insert(SkipReason::Manual);
        self.status = ItemStatus::Skipped;
        self.archived_url = None;
    }

    /// Includes the link in future runs
    pub(crate) fn include(&mut self) {
        self.included = true;
        self.skip_reason = None;
        self.status = ItemStatus::Ready;
        self.archived_url = None;
    }

    /// Puts the link back to `ready` ahead of a run
    pub(crate) fn reset_for_run(&mut self) {
        self.status = ItemStatus::Ready;
        self.archived_url = None;
    }

    /// Marks the link as claimed by a worker
    pub(crate) fn mark_saving(&mut self) {
        self.status = ItemStatus::Saving;
        self.archived_url = None;
    }

    /// Stores the orchestrator's verdict
    pub(crate) fn record_outcome(&mut self, outcome: Outcome) {
        self.status = outcome.status();
        self.archived_url = outcome.into_archived_url();
    }
}

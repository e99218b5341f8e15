use crate::state::{ItemId, ItemSource, PreservationItem};
use crate::url::{normalize_batch, normalize_link};
use crate::{ArchiveError, Result};

/// Which links an archive run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Every included link, including ones saved by an earlier run
    Full,
    /// Included links whose last run left them unresolved; saved links are untouched
    RetryUnresolved,
}

impl RunKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "Archiving included links",
            Self::RetryUnresolved => "Retrying unresolved links",
        }
    }

    fn targets(&self, item: &PreservationItem) -> bool {
        match self {
            Self::Full => item.is_included(),
            Self::RetryUnresolved => item.is_included() && item.status().is_unresolved(),
        }
    }
}

/// The collection of links managed in one session
///
/// Runs borrow the targeted items mutably, so the set cannot be edited and no
/// second run can be prepared while a run is in flight.
#[derive(Debug, Default, Clone)]
pub struct LinkSet {
    items: Vec<PreservationItem>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a link set from the extractor's raw output
    ///
    /// Links are normalized and deduplicated; anything that is not an HTTP(S)
    /// link is dropped.
    pub fn from_extracted<'a, I>(raw_links: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let items = normalize_batch(raw_links)
            .into_iter()
            .map(|url| PreservationItem::new(url, ItemSource::Extracted))
            .collect();

        Self { items }
    }

    /// Adds a link typed in by the user
    ///
    /// # Returns
    ///
    /// * `Ok(ItemId)` - The id of the new item
    /// * `Err(ArchiveError::UrlError)` - The link could not be normalized
    /// * `Err(ArchiveError::DuplicateLink)` - The link is already listed
    pub fn add_manual(&mut self, raw: &str) -> Result<ItemId> {
        let url = normalize_link(raw)?;

        if self
            .items
            .iter()
            .any(|item| item.original_url().as_str() == url.as_str())
        {
            return Err(ArchiveError::DuplicateLink(url.to_string()));
        }

        let item = PreservationItem::new(url, ItemSource::Manual);
        let id = item.id();
        self.items.push(item);
        Ok(id)
    }

    /// Includes or excludes a link from future runs
    pub fn set_included(&mut self, id: ItemId, included: bool) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(ArchiveError::UnknownItem(id))?;

        if included {
            item.include();
        } else {
            item.exclude();
        }
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&PreservationItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[PreservationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Included links
    pub fn included(&self) -> impl Iterator<Item = &PreservationItem> {
        self.items.iter().filter(|item| item.is_included())
    }

    /// Included links that a retry run would pick up
    pub fn retry_candidates(&self) -> impl Iterator<Item = &PreservationItem> {
        self.items
            .iter()
            .filter(|item| RunKind::RetryUnresolved.targets(item))
    }

    /// Selects the links a run of the given kind targets and resets them to `ready`
    ///
    /// Items that are not targeted are neither returned nor modified.
    pub fn prepare_run(&mut self, kind: RunKind) -> Vec<&mut PreservationItem> {
        self.items
            .iter_mut()
            .filter(|item| kind.targets(item))
            .map(|item| {
                item.reset_for_run();
                item
            })
            .collect()
    }
}

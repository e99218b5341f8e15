//! URL handling module for ArchiveLinks
//!
//! Raw links extracted from manuscripts are messy: wrapped across lines, defanged,
//! missing their scheme, or dragging punctuation from the surrounding sentence.
//! This module turns them into absolute HTTP(S) URLs and recognizes DOI links,
//! which are skipped by default.

mod doi;
mod normalize;

pub use doi::is_doi_url;
pub use normalize::normalize_link;

use std::collections::HashSet;
use url::Url;

/// Normalizes a batch of raw links, dropping rejects and duplicates
///
/// Order of first appearance is preserved.
///
/// # Examples
///
/// ```
/// use archivelinks::url::normalize_batch;
///
/// let links = normalize_batch(["example.org", "https://example.org/", "ftp://x.org"]);
/// assert_eq!(links.len(), 1);
/// ```
pub fn normalize_batch<'a, I>(raw_links: I) -> Vec<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for raw in raw_links {
        match normalize_link(raw) {
            Ok(url) => {
                if seen.insert(url.as_str().to_string()) {
                    urls.push(url);
                }
            }
            Err(e) => tracing::debug!("Dropping link {:?}: {}", raw, e),
        }
    }

    urls
}

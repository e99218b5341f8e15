//! State module for tracking preservation progress
//!
//! This module provides the data model for links during an archive session.
//!
//! # Components
//!
//! - `ItemStatus`: The status of a single link (ready, saving, saved, unresolved, skipped)
//! - `PreservationItem`: One link with its status and archived snapshot
//! - `LinkSet`: The session's collection of links, and run target selection

mod item;
mod item_status;
mod link_set;

// Re-export main types
pub use item::{ItemId, ItemSource, PreservationItem, SkipReason};
pub use item_status::ItemStatus;
pub use link_set::{LinkSet, RunKind};

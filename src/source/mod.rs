//! Todoist side of the export
//!
//! This module contains the read-only input model:
//! - `model`: projects, items, labels and notes as found in a full-sync dump
//! - `forest`: explicit project hierarchy derived from indent and order
//! - `snapshot`: the account snapshot with its named-group queries

mod forest;
mod model;
mod snapshot;

pub use forest::ProjectForest;
pub use model::{FileAttachment, SourceItem, SourceLabel, SourceNote, SourceProject};
pub use snapshot::Snapshot;

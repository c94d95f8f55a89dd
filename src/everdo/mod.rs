//! Everdo side of the export
//!
//! - `ids`: Everdo identifiers (uppercase UUID-4 hex)
//! - `item`: items, tags and their closed code sets
//! - `xref`: Todoist id to Everdo entity cross-reference
//! - `document`: the import document and its atomic writer

mod document;
mod ids;
mod item;
mod xref;

pub use document::EverdoFile;
pub use ids::EverdoId;
pub use item::{EverdoItem, EverdoTag, ItemType, ListType, NewItem, TagType};
pub use xref::{CrossReference, Slot, SourceKey};

//! Everdo import document
//!
//! Collects built items and tags in insertion order, keeps the cross-reference
//! table in sync with them, and writes the final JSON file.

use super::ids::EverdoId;
use super::item::{EverdoItem, EverdoTag};
use super::xref::{CrossReference, Slot, SourceKey};
use crate::error::{ExportError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Serialize)]
struct DocumentRef<'a> {
    items: &'a [EverdoItem],
    tags: &'a [EverdoTag],
}

/// The whole export: items, tags and the id cross-reference
#[derive(Debug, Default)]
pub struct EverdoFile {
    items: Vec<EverdoItem>,
    tags: Vec<EverdoTag>,
    xref: CrossReference,
}

impl EverdoFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, optionally registering the label it was built from
    ///
    /// # Returns
    /// The tag's Everdo id
    pub fn add_tag(&mut self, tag: EverdoTag, source: Option<SourceKey>) -> EverdoId {
        let id = tag.id().clone();
        self.xref.place(id.clone(), Slot::Tag(self.tags.len()));
        if let Some(key) = source {
            self.xref.associate(key, id.clone());
        }
        self.tags.push(tag);
        id
    }

    /// Add an item, optionally registering the project/item it was built from
    ///
    /// # Returns
    /// The item's Everdo id
    pub fn add_item(&mut self, item: EverdoItem, source: Option<SourceKey>) -> EverdoId {
        let id = item.id().clone();
        self.xref.place(id.clone(), Slot::Item(self.items.len()));
        if let Some(key) = source {
            self.xref.associate(key, id.clone());
        }
        self.items.push(item);
        id
    }

    /// Point an extra source id at an existing entity (first write wins)
    pub fn alias(&mut self, source: SourceKey, target: &EverdoId) -> bool {
        self.xref.associate(source, target.clone())
    }

    pub fn items(&self) -> &[EverdoItem] {
        &self.items
    }

    pub fn tags(&self) -> &[EverdoTag] {
        &self.tags
    }

    pub fn item(&self, id: &EverdoId) -> Option<&EverdoItem> {
        match self.xref.slot_of(id)? {
            Slot::Item(idx) => self.items.get(idx),
            Slot::Tag(_) => None,
        }
    }

    pub fn item_mut(&mut self, id: &EverdoId) -> Option<&mut EverdoItem> {
        match self.xref.slot_of(id)? {
            Slot::Item(idx) => self.items.get_mut(idx),
            Slot::Tag(_) => None,
        }
    }

    pub fn tag(&self, id: &EverdoId) -> Option<&EverdoTag> {
        match self.xref.slot_of(id)? {
            Slot::Tag(idx) => self.tags.get(idx),
            Slot::Item(_) => None,
        }
    }

    /// Item built for (or aliased to) the given source id
    pub fn item_for_source_mut(&mut self, source: SourceKey) -> Option<&mut EverdoItem> {
        match self.xref.resolve(source)? {
            Slot::Item(idx) => self.items.get_mut(idx),
            Slot::Tag(_) => None,
        }
    }

    /// Tag id registered for a Todoist label
    pub fn tag_id_for_label(&self, label_id: u64) -> Result<EverdoId> {
        match self.xref.resolve(SourceKey::Label(label_id)) {
            Some(Slot::Tag(idx)) => Ok(self.tags[idx].id().clone()),
            _ => Err(ExportError::LabelNotRegistered(label_id)),
        }
    }

    /// Render the document as pretty-printed JSON
    ///
    /// Non-ASCII text is written as-is, never as `\u` escapes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let doc = DocumentRef {
            items: &self.items,
            tags: &self.tags,
        };
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        doc.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Write the document to a stream
    ///
    /// The JSON is rendered completely before the first byte is written.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        let json = self.to_json()?;
        out.write_all(&json)?;
        out.flush()?;
        Ok(())
    }

    /// Write the document to a file atomically
    ///
    /// The JSON goes to a temporary file next to `path`, which is renamed over
    /// `path` only once fully written. On error the target is left untouched.
    ///
    /// # Arguments
    /// * `path` - Destination file
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
        Ok(())
    }
}

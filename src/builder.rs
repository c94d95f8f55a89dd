//! Entity construction
//!
//! Turns Todoist records plus a classification into Everdo items and tags.
//! Tag ids are resolved through the document's cross-reference table, so the
//! tag pass has to run before any item is built.

use crate::classify::{Classifier, Placement};
use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::everdo::{
    EverdoFile, EverdoId, EverdoItem, EverdoTag, ItemType, ListType, NewItem, SourceKey, TagType,
};
use crate::source::{SourceItem, SourceLabel, SourceNote, SourceProject};
use crate::timestamp::ExportClock;

/// An item ready to be added to the document
#[derive(Debug)]
pub struct BuiltItem {
    pub item: EverdoItem,
    /// Inline `__label` markers that matched no label
    pub unresolved_markers: Vec<String>,
    /// Ids of deleted labels still attached to the item; they get no tag
    pub deleted_labels: Vec<u64>,
}

pub struct EntityBuilder<'a> {
    config: &'a Config,
    classifier: &'a Classifier<'a>,
    clock: ExportClock,
}

impl<'a> EntityBuilder<'a> {
    pub fn new(config: &'a Config, classifier: &'a Classifier<'a>, clock: ExportClock) -> Self {
        Self {
            config,
            classifier,
            clock,
        }
    }

    /// Build the tag for a Todoist label
    ///
    /// The contact color turns the label into a contact; the context color
    /// keeps it a label but prefixes the title with `@`.
    pub fn label_tag(&self, label: &SourceLabel) -> Result<EverdoTag> {
        let (kind, title) = if label.color == self.config.contact_color {
            (TagType::Contact, label.name.clone())
        } else if label.color == self.config.context_color {
            (TagType::Label, format!("@{}", label.name))
        } else {
            (TagType::Label, label.name.clone())
        };
        EverdoTag::new(kind, title, self.clock.today_stamp())
    }

    /// Build the area tag for a root of the active tree
    pub fn area_tag(&self, root: &SourceProject) -> Result<EverdoTag> {
        EverdoTag::new(TagType::Area, root.name.trim(), self.clock.today_stamp())
    }

    /// Build a project or notebook
    ///
    /// # Arguments
    /// * `project` - The Todoist project
    /// * `kind` - `Project` or `Notebook`
    /// * `list` / `completed_on` - Result of project classification
    /// * `tags` - Tag ids to attach, e.g. the area
    pub fn container(
        &self,
        project: &SourceProject,
        kind: ItemType,
        list: ListType,
        completed_on: Option<i64>,
        tags: Vec<EverdoId>,
    ) -> Result<EverdoItem> {
        if !kind.is_container() {
            return Err(ExportError::Contract(format!(
                "type '{}' is not a project or notebook",
                kind
            )));
        }
        let mut fields = NewItem::new(kind, list, project.name.trim(), self.clock.today_stamp());
        fields.is_focused = project.is_favorite;
        fields.completed_on = completed_on;
        fields.tags = tags;
        EverdoItem::new(fields)
    }

    /// Build an action or note from a Todoist item
    ///
    /// The tag list is the union of the item's own labels and any inline
    /// `__label` markers in its text; resolved markers are stripped from the
    /// title. A waiting action tagged with a contact waits for that contact.
    ///
    /// # Arguments
    /// * `item` - The Todoist item
    /// * `placement` - Classification result
    /// * `kind` - `Action` or `Note`
    /// * `parent` - Everdo id of the owning project or notebook
    /// * `file` - Document holding the already exported tags
    ///
    /// # Returns
    /// The built item, or `LabelNotRegistered` if one of the item's labels
    /// is unknown to the snapshot. Deleted labels are dropped and reported in
    /// [`BuiltItem::deleted_labels`].
    pub fn leaf(
        &self,
        item: &SourceItem,
        placement: &Placement,
        kind: ItemType,
        parent: Option<&EverdoId>,
        file: &EverdoFile,
    ) -> Result<BuiltItem> {
        if kind.is_container() {
            return Err(ExportError::Contract(format!(
                "type '{}' is not an action or note",
                kind
            )));
        }

        let inline = self.classifier.inline_labels(&item.content);

        let mut tags: Vec<EverdoId> =
            Vec::with_capacity(item.labels.len() + inline.label_ids.len());
        let mut deleted_labels = Vec::new();
        for &label_id in &item.labels {
            let tag = match file.tag_id_for_label(label_id) {
                Ok(tag) => tag,
                Err(_) if self.classifier.is_deleted_label(label_id) => {
                    deleted_labels.push(label_id);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        for &label_id in &inline.label_ids {
            match file.tag_id_for_label(label_id) {
                Ok(tag) if !tags.contains(&tag) => tags.push(tag),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping inline label on item {}: {}", item.id, e),
            }
        }

        let contact_id = if placement.list == ListType::Waiting {
            tags.iter()
                .find(|t| file.tag(t).is_some_and(|tag| tag.kind() == TagType::Contact))
                .cloned()
        } else {
            None
        };

        let mut fields = NewItem::new(
            kind,
            placement.list,
            inline.text,
            self.classifier.created_stamp(item)?,
        );
        fields.completed_on = placement.completed_on;
        fields.due_date = placement.due_date;
        fields.tags = tags;
        fields.contact_id = contact_id;
        fields.parent_id = parent.cloned();

        Ok(BuiltItem {
            item: EverdoItem::new(fields)?,
            unresolved_markers: inline.unresolved,
            deleted_labels,
        })
    }
}

/// Append a Todoist comment to the Everdo entity built for its item
///
/// Attachment links are appended on their own lines after the text.
///
/// # Returns
/// `MissingReference` when the commented item was never converted, e.g.
/// because it was deleted
pub fn merge_comment(file: &mut EverdoFile, note: &SourceNote) -> Result<()> {
    let key = SourceKey::Item(note.item_id);
    let target = file
        .item_for_source_mut(key)
        .ok_or_else(|| ExportError::MissingReference(key.to_string()))?;

    target.append_note(note.content.trim_end());
    if let Some(attachment) = &note.file_attachment {
        for link in attachment.links() {
            target.append_note(link);
        }
    }
    Ok(())
}

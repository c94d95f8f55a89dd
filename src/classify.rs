//! Hierarchy classification
//!
//! Decides where each Todoist project and item lands in Everdo. The policy is
//! applied in order and the first matching rule wins:
//!
//! 1. deleted records are not exported at all
//! 2. inbox items always go to the inbox
//! 3. headings (`* Heading`, `Heading:`) are folded into the owner's notes
//! 4. a caller-supplied list overrides the flag logic (standalone someday items)
//! 5. completed or archived items are archived, with a completion date
//! 6. items carrying the waiting label are waiting
//! 7. everything else is active
//!
//! Items inside someday projects additionally report their due date so the
//! owning project can be promoted to the scheduled list.

use crate::config::Config;
use crate::error::Result;
use crate::everdo::ListType;
use crate::source::{Snapshot, SourceItem, SourceProject};
use crate::timestamp::{self, ExportClock};
use regex::Regex;
use std::sync::LazyLock;

/// Inline "inactive label" marker, e.g. `__waiting`, with its leading blanks
static INLINE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*__(\p{L}+)").expect("inline label pattern is valid"));

/// Which part of the Todoist tree an item is being exported from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Items of the special inbox project
    Inbox,
    /// Items of an active project, a copied project or a notebook
    Project,
    /// Items of a project below a someday root
    SomedayProject,
    /// Items sitting directly under a root, optionally forced into a list
    Standalone(Option<ListType>),
}

/// Which export pass a project is being exported by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tree {
    Active,
    Someday,
}

/// Placement decided for one convertible item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub list: ListType,
    /// Day-aligned completion date; set exactly when `list` is archived
    pub completed_on: Option<i64>,
    pub due_date: Option<i64>,
    /// Start date the owning project should be scheduled from, if any
    pub schedules_owner: Option<i64>,
}

/// Outcome of classifying one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Deleted; nothing is exported
    Skip,
    /// Heading; fold the text into the owner's note body
    Fold { schedules_owner: Option<i64> },
    /// Convert into its own Everdo entity
    Convert(Placement),
}

/// Classifier bound to one snapshot and one export clock
pub struct Classifier<'a> {
    snapshot: &'a Snapshot,
    clock: ExportClock,
    waiting_label: Option<u64>,
}

impl<'a> Classifier<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &Config, clock: ExportClock) -> Self {
        let waiting_label = snapshot.label_id_by_name(&config.waiting_label);
        if waiting_label.is_none() {
            tracing::debug!(
                "No label named '{}', no item will be classified as waiting",
                config.waiting_label
            );
        }
        Self {
            snapshot,
            clock,
            waiting_label,
        }
    }

    /// Check if an item carries the waiting label directly
    pub fn is_waiting(&self, item: &SourceItem) -> bool {
        self.waiting_label.is_some_and(|id| item.has_label(id))
    }

    /// Check if a label id names a label that exists but was deleted
    pub fn is_deleted_label(&self, label_id: u64) -> bool {
        self.snapshot
            .label_by_id(label_id)
            .is_some_and(|label| label.is_deleted)
    }

    /// Classify a Todoist item
    ///
    /// # Arguments
    /// * `item` - The source item
    /// * `branch` - Where in the tree the item was found
    ///
    /// # Returns
    /// The verdict, or an error if one of the item's dates is unparseable
    pub fn classify_item(&self, item: &SourceItem, branch: Branch) -> Result<Verdict> {
        if item.is_deleted {
            return Ok(Verdict::Skip);
        }

        let due_date = item
            .due_date_utc
            .as_deref()
            .map(timestamp::normalize)
            .transpose()?;

        if branch == Branch::Inbox {
            return Ok(Verdict::Convert(Placement {
                list: ListType::Inbox,
                completed_on: None,
                due_date,
                schedules_owner: None,
            }));
        }

        let completed = item.is_completed();
        let schedules_owner = match branch {
            Branch::SomedayProject if !completed => due_date,
            _ => None,
        };

        if item.is_title() {
            return Ok(Verdict::Fold { schedules_owner });
        }

        let list = match branch {
            Branch::Standalone(Some(forced)) => forced,
            _ if completed => ListType::Archived,
            _ if self.is_waiting(item) => ListType::Waiting,
            _ => ListType::Active,
        };
        let completed_on = if list == ListType::Archived {
            Some(self.completion_stamp(item)?)
        } else {
            None
        };

        Ok(Verdict::Convert(Placement {
            list,
            completed_on,
            due_date,
            schedules_owner,
        }))
    }

    /// Classify a Todoist project for the given pass
    ///
    /// # Returns
    /// `None` for deleted projects, otherwise the list and completion date
    pub fn classify_project(
        &self,
        project: &SourceProject,
        tree: Tree,
    ) -> Option<(ListType, Option<i64>)> {
        if project.is_deleted {
            return None;
        }
        if project.is_archived {
            // Projects carry no completion date; the export day stands in
            return Some((ListType::Archived, Some(self.clock.today_stamp())));
        }
        Some(match tree {
            Tree::Active => (ListType::Active, None),
            Tree::Someday => (ListType::Someday, None),
        })
    }

    /// Day-aligned creation date, falling back to the export day
    pub fn created_stamp(&self, item: &SourceItem) -> Result<i64> {
        match item.date_added.as_deref() {
            Some(raw) => timestamp::normalize(raw),
            None => Ok(self.clock.today_stamp()),
        }
    }

    fn completion_stamp(&self, item: &SourceItem) -> Result<i64> {
        match item.date_completed.as_deref() {
            Some(raw) => timestamp::normalize(raw),
            None => Ok(self.clock.today_stamp()),
        }
    }

    /// Pull `__label` markers out of the item text
    ///
    /// Markers naming an existing label are removed from the text and their
    /// label ids returned. Markers that name no label stay in the text and are
    /// reported as unresolved.
    pub fn inline_labels(&self, content: &str) -> InlineLabels {
        let mut text = String::with_capacity(content.len());
        let mut label_ids = Vec::new();
        let mut unresolved = Vec::new();
        let mut last = 0;

        for caps in INLINE_LABEL.captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            match self.snapshot.label_id_by_name(name.as_str()) {
                Some(id) => {
                    text.push_str(&content[last..whole.start()]);
                    last = whole.end();
                    if !label_ids.contains(&id) {
                        label_ids.push(id);
                    }
                }
                None => unresolved.push(name.as_str().to_string()),
            }
        }
        text.push_str(&content[last..]);

        InlineLabels {
            text: text.trim().to_string(),
            label_ids,
            unresolved,
        }
    }
}

/// Result of scanning item text for inline label markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineLabels {
    /// Text with resolved markers removed
    pub text: String,
    pub label_ids: Vec<u64>,
    /// Marker names without a matching label
    pub unresolved: Vec<String>,
}

/// Check for a human due date without a machine-readable one
///
/// Only `due_date_utc` is used for export; an item with just a `date_string`
/// loses its date, which is worth a warning.
pub fn has_due_date_mismatch(item: &SourceItem) -> bool {
    if item.date_string.is_some() && item.due_date_utc.is_none() {
        tracing::warn!(
            "Due date mismatch on item {}: date_string {:?} without due_date_utc, ignoring it",
            item.id,
            item.date_string.as_deref().unwrap_or_default()
        );
        return true;
    }
    false
}

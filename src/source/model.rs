//! Source-side records as found in a Todoist full-sync snapshot
//!
//! The sync API encodes flags as `0`/`1` integers while hand-written fixtures
//! tend to use booleans, so flags accept either. Blank date strings are treated
//! the same as absent ones.

use serde::{Deserialize, Deserializer, Serialize};

/// A Todoist project
///
/// Projects carry no parent pointer. Nesting is encoded by `indent` together
/// with the global `item_order`; see [`super::ProjectForest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceProject {
    pub id: u64,
    pub name: String,
    /// Nesting depth; only compared between projects, so top-level may be 0 or 1
    pub indent: u32,
    /// Global ordering key among all projects
    pub item_order: i64,
    #[serde(deserialize_with = "flag")]
    pub is_deleted: bool,
    #[serde(deserialize_with = "flag")]
    pub is_archived: bool,
    #[serde(deserialize_with = "flag")]
    pub is_favorite: bool,
}

/// A Todoist item (task)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceItem {
    pub id: u64,
    pub project_id: u64,
    pub content: String,
    /// Ordering key among the items of one project
    pub item_order: i64,
    #[serde(deserialize_with = "flag")]
    pub is_deleted: bool,
    #[serde(deserialize_with = "flag")]
    pub is_archived: bool,
    /// Canonical machine-readable due date
    #[serde(deserialize_with = "non_blank")]
    pub due_date_utc: Option<String>,
    /// Human-entered due date text ("every monday", "tomorrow")
    #[serde(deserialize_with = "non_blank")]
    pub date_string: Option<String>,
    #[serde(deserialize_with = "non_blank")]
    pub date_added: Option<String>,
    #[serde(deserialize_with = "non_blank")]
    pub date_completed: Option<String>,
    /// Ids of the labels attached to the item
    pub labels: Vec<u64>,
}

impl SourceItem {
    /// Check if the item is a heading rather than an action
    ///
    /// Headings are written as `* Heading` or `Heading:` in Todoist.
    pub fn is_title(&self) -> bool {
        self.content.starts_with("* ") || self.content.trim_end().ends_with(':')
    }

    /// Check if the item has been completed or archived
    pub fn is_completed(&self) -> bool {
        self.is_archived || self.date_completed.is_some()
    }

    pub fn has_label(&self, label_id: u64) -> bool {
        self.labels.contains(&label_id)
    }
}

/// A Todoist label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLabel {
    pub id: u64,
    pub name: String,
    pub color: i64,
    #[serde(deserialize_with = "flag")]
    pub is_deleted: bool,
}

/// A file uploaded alongside a note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAttachment {
    #[serde(deserialize_with = "non_blank")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "non_blank")]
    pub file_url: Option<String>,
    #[serde(deserialize_with = "non_blank")]
    pub url: Option<String>,
}

impl FileAttachment {
    /// Links worth keeping in the exported note body, in a stable order
    pub fn links(&self) -> impl Iterator<Item = &str> {
        [self.file_url.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
    }
}

/// A Todoist comment attached to an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceNote {
    pub id: u64,
    pub item_id: u64,
    pub content: String,
    #[serde(deserialize_with = "flag")]
    pub is_deleted: bool,
    #[serde(deserialize_with = "flag")]
    pub is_archived: bool,
    pub file_attachment: Option<FileAttachment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

/// Accept `true`/`false`, `0`/`1` or `null` for boolean flags
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFlag>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Int(i)) => i != 0,
        None => false,
    })
}

/// Map `null`, `""` and whitespace-only strings to `None`
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

//! Everdo import records
//!
//! Items and tags serialize to exactly the JSON objects Everdo's importer reads.
//! The enumerated codes are closed enums, and every constructor checks the
//! field combinations Everdo rejects, so a classifier bug surfaces as an error
//! at build time instead of as a broken import.

use super::ids::EverdoId;
use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;

/// Kind of an Everdo item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "a")]
    Action,
    #[serde(rename = "p")]
    Project,
    #[serde(rename = "n")]
    Note,
    #[serde(rename = "l")]
    Notebook,
}

impl ItemType {
    pub fn code(self) -> char {
        match self {
            ItemType::Action => 'a',
            ItemType::Project => 'p',
            ItemType::Note => 'n',
            ItemType::Notebook => 'l',
        }
    }

    /// Projects and notebooks own other items; actions and notes are leaves
    pub fn is_container(self) -> bool {
        matches!(self, ItemType::Project | ItemType::Notebook)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// List an Everdo item is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListType {
    /// Unprocessed (actions only)
    #[serde(rename = "i")]
    Inbox,
    /// Active/next, depending on item type
    #[serde(rename = "a")]
    Active,
    /// Someday/maybe
    #[serde(rename = "m")]
    Someday,
    /// Scheduled; needs a start date
    #[serde(rename = "s")]
    Scheduled,
    #[serde(rename = "w")]
    Waiting,
    #[serde(rename = "d")]
    Deleted,
    /// Done; needs a completion date
    #[serde(rename = "r")]
    Archived,
}

impl ListType {
    pub fn code(self) -> char {
        match self {
            ListType::Inbox => 'i',
            ListType::Active => 'a',
            ListType::Someday => 'm',
            ListType::Scheduled => 's',
            ListType::Waiting => 'w',
            ListType::Deleted => 'd',
            ListType::Archived => 'r',
        }
    }
}

impl FromStr for ListType {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "i" => Ok(ListType::Inbox),
            "a" => Ok(ListType::Active),
            "m" => Ok(ListType::Someday),
            "s" => Ok(ListType::Scheduled),
            "w" => Ok(ListType::Waiting),
            "d" => Ok(ListType::Deleted),
            "r" => Ok(ListType::Archived),
            _ => Err(ExportError::InvalidListCode(s.to_string())),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of an Everdo tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    #[serde(rename = "c")]
    Contact,
    #[serde(rename = "a")]
    Area,
    #[serde(rename = "l")]
    Label,
}

impl TagType {
    pub fn code(self) -> char {
        match self {
            TagType::Contact => 'c',
            TagType::Area => 'a',
            TagType::Label => 'l',
        }
    }
}

impl FromStr for TagType {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "c" => Ok(TagType::Contact),
            "a" => Ok(TagType::Area),
            "l" => Ok(TagType::Label),
            _ => Err(ExportError::InvalidTagCode(s.to_string())),
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A tag: contact, area or label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EverdoTag {
    id: EverdoId,
    title: String,
    title_ts: Option<i64>,
    color: Option<i64>,
    color_ts: Option<i64>,
    #[serde(rename = "type")]
    kind: TagType,
    type_ts: Option<i64>,
    created_on: Option<i64>,
    changed_ts: Option<i64>,
    removed_ts: Option<i64>,
}

impl EverdoTag {
    /// Create a tag with a freshly generated id
    ///
    /// # Arguments
    /// * `kind` - Contact, area or label
    /// * `title` - Display title
    /// * `created_on` - Day-aligned UNIX timestamp
    pub fn new(kind: TagType, title: impl Into<String>, created_on: i64) -> Result<Self> {
        check_day_aligned("created_on", created_on)?;
        Ok(Self {
            id: EverdoId::generate(),
            title: title.into(),
            title_ts: None,
            color: None,
            color_ts: None,
            kind,
            type_ts: None,
            created_on: Some(created_on),
            changed_ts: None,
            removed_ts: None,
        })
    }

    pub fn id(&self) -> &EverdoId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> TagType {
        self.kind
    }
}

/// Everything needed to construct an [`EverdoItem`]
#[derive(Debug, Clone)]
pub struct NewItem {
    pub kind: ItemType,
    pub list: ListType,
    pub title: String,
    pub note: String,
    pub created_on: i64,
    pub is_focused: bool,
    pub completed_on: Option<i64>,
    pub due_date: Option<i64>,
    pub start_date: Option<i64>,
    pub tags: Vec<EverdoId>,
    pub contact_id: Option<EverdoId>,
    pub parent_id: Option<EverdoId>,
}

impl NewItem {
    /// Minimal item description; optional fields start out empty
    pub fn new(kind: ItemType, list: ListType, title: impl Into<String>, created_on: i64) -> Self {
        Self {
            kind,
            list,
            title: title.into(),
            note: String::new(),
            created_on,
            is_focused: false,
            completed_on: None,
            due_date: None,
            start_date: None,
            tags: Vec::new(),
            contact_id: None,
            parent_id: None,
        }
    }
}

/// An action, project, note or notebook
///
/// After construction only the note body, the scheduled promotion and the
/// contact can change; everything else is fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EverdoItem {
    id: EverdoId,
    #[serde(rename = "type")]
    kind: ItemType,
    list: ListType,
    note: String,
    completed_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<EverdoId>,
    title: String,
    created_on: i64,
    /// 0 or 1; Everdo does not accept JSON booleans here
    is_focused: u8,
    energy: Option<u8>,
    time: Option<u32>,
    due_date: Option<i64>,
    start_date: Option<i64>,
    schedule: Option<serde_json::Value>,
    recurrent_task_id: Option<String>,
    contact_id: Option<EverdoId>,
    tags: Vec<EverdoId>,
    repeated_on: Option<i64>,
}

impl EverdoItem {
    /// Construct an item with a freshly generated id
    ///
    /// Rejected combinations:
    /// - containers (projects, notebooks) in the inbox, or with a parent
    /// - `completed_on` set on anything but an archived item, or missing on one
    /// - scheduled items without a start date
    /// - timestamps that are not at 00:00:00 UTC
    pub fn new(fields: NewItem) -> Result<Self> {
        let NewItem {
            kind,
            list,
            title,
            note,
            created_on,
            is_focused,
            completed_on,
            due_date,
            start_date,
            tags,
            contact_id,
            parent_id,
        } = fields;

        if kind.is_container() && list == ListType::Inbox {
            return Err(ExportError::Contract(format!(
                "type '{}' item '{}' cannot be placed in the inbox",
                kind, title
            )));
        }
        if kind.is_container() && parent_id.is_some() {
            return Err(ExportError::Contract(format!(
                "type '{}' item '{}' cannot have a parent",
                kind, title
            )));
        }
        if (list == ListType::Archived) != completed_on.is_some() {
            return Err(ExportError::Contract(format!(
                "'{}' in list '{}' with completed_on {:?}",
                title, list, completed_on
            )));
        }
        if list == ListType::Scheduled && start_date.is_none() {
            return Err(ExportError::Contract(format!(
                "scheduled '{}' needs a start date",
                title
            )));
        }
        check_day_aligned("created_on", created_on)?;
        for (field, value) in [
            ("completed_on", completed_on),
            ("due_date", due_date),
            ("start_date", start_date),
        ] {
            if let Some(stamp) = value {
                check_day_aligned(field, stamp)?;
            }
        }

        Ok(Self {
            id: EverdoId::generate(),
            kind,
            list,
            note,
            completed_on,
            parent_id,
            title,
            created_on,
            is_focused: u8::from(is_focused),
            energy: None,
            time: None,
            due_date,
            start_date,
            schedule: None,
            recurrent_task_id: None,
            contact_id,
            tags,
            repeated_on: None,
        })
    }

    pub fn id(&self) -> &EverdoId {
        &self.id
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    pub fn list(&self) -> ListType {
        self.list
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn created_on(&self) -> i64 {
        self.created_on
    }

    pub fn is_focused(&self) -> u8 {
        self.is_focused
    }

    pub fn completed_on(&self) -> Option<i64> {
        self.completed_on
    }

    pub fn due_date(&self) -> Option<i64> {
        self.due_date
    }

    pub fn start_date(&self) -> Option<i64> {
        self.start_date
    }

    pub fn tags(&self) -> &[EverdoId] {
        &self.tags
    }

    pub fn contact_id(&self) -> Option<&EverdoId> {
        self.contact_id.as_ref()
    }

    pub fn parent_id(&self) -> Option<&EverdoId> {
        self.parent_id.as_ref()
    }

    /// Append a line of free text to the note body
    pub fn append_note(&mut self, text: &str) {
        if !self.note.is_empty() {
            self.note.push('\n');
        }
        self.note.push_str(text);
    }

    /// Move the item to the scheduled list, starting no later than `start`
    ///
    /// Repeated calls only ever lower the start date. Archived items stay
    /// archived.
    pub fn schedule_from(&mut self, start: i64) -> Result<()> {
        check_day_aligned("start_date", start)?;
        if self.list == ListType::Archived {
            return Ok(());
        }
        self.list = ListType::Scheduled;
        self.start_date = Some(match self.start_date {
            Some(current) => current.min(start),
            None => start,
        });
        Ok(())
    }

    pub fn set_contact(&mut self, contact: EverdoId) {
        self.contact_id = Some(contact);
    }
}

fn check_day_aligned(field: &str, stamp: i64) -> Result<()> {
    if stamp.rem_euclid(SECONDS_PER_DAY) != 0 {
        return Err(ExportError::Contract(format!(
            "{} {} is not at 00:00:00 UTC",
            field, stamp
        )));
    }
    Ok(())
}

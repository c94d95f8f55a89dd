//! Error taxonomy for the export engine
//!
//! Fatal conditions (missing or ambiguous named projects, unregistered labels,
//! construction contract violations) are returned as `ExportError` and abort the
//! export. Non-fatal conditions (dangling note references, due-date mismatches)
//! are logged and counted in the export summary instead.

use thiserror::Error;

/// Errors raised while translating a source snapshot into an Everdo document
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required named project does not exist in the snapshot
    #[error("No project with name: {0}")]
    ProjectNotFound(String),

    /// A named project lookup matched more than one project
    #[error("Several projects with name: {name} ({count} matches)")]
    DuplicateProject { name: String, count: usize },

    /// An item references a label that was never registered as a tag
    #[error("Label {0} has not been exported as a tag")]
    LabelNotRegistered(u64),

    /// A source id has no converted counterpart in the cross-reference table
    #[error("No converted entity for source {0}")]
    MissingReference(String),

    /// A list placement code outside the enumerated set
    #[error("Invalid list type '{0}'. Valid list types: i, a, m, s, w, d, r")]
    InvalidListCode(String),

    /// A tag type code outside the enumerated set
    #[error("Invalid tag type '{0}'. Valid tag types: c, a, l")]
    InvalidTagCode(String),

    /// An entity was constructed with a field combination the target rejects
    #[error("Contract violation: {0}")]
    Contract(String),

    /// A source date string could not be parsed
    #[error("Unparseable date '{0}'")]
    Timestamp(String),

    /// The configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;

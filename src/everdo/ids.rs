use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an Everdo item or tag
///
/// Everdo expects a random UUID-4 rendered as 32 uppercase hex digits without
/// dashes. Ids are assigned once, when the entity is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EverdoId(String);

impl EverdoId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        let mut buf = Uuid::encode_buffer();
        let hex = Uuid::new_v4().simple().encode_upper(&mut buf);
        Self(hex.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EverdoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

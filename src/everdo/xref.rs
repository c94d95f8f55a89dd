//! Cross-reference table between Todoist ids and Everdo entities
//!
//! Later passes (comments, labels on items) only know Todoist ids; this table
//! resolves them to the Everdo entity that was built for them.

use super::ids::EverdoId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// Todoist id, qualified by the collection it came from
///
/// Todoist only guarantees id uniqueness within one collection, so a label and
/// an item may share a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Project(u64),
    Item(u64),
    Label(u64),
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKey::Project(id) => write!(f, "project {}", id),
            SourceKey::Item(id) => write!(f, "item {}", id),
            SourceKey::Label(id) => write!(f, "label {}", id),
        }
    }
}

/// Where an Everdo entity lives inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Item(usize),
    Tag(usize),
}

/// Source-to-target id map plus target-id-to-entity index
#[derive(Debug, Clone, Default)]
pub struct CrossReference {
    source_to_target: HashMap<SourceKey, EverdoId>,
    target_to_slot: HashMap<EverdoId, Slot>,
}

impl CrossReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a source id with a target id, first write wins
    ///
    /// # Returns
    /// `true` if the association was recorded, `false` if the source id was
    /// already mapped (the existing mapping is kept)
    pub fn associate(&mut self, source: SourceKey, target: EverdoId) -> bool {
        match self.source_to_target.entry(source) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(target);
                true
            }
        }
    }

    /// Record where a target entity is stored
    pub(crate) fn place(&mut self, target: EverdoId, slot: Slot) {
        self.target_to_slot.insert(target, slot);
    }

    pub fn target_of(&self, source: SourceKey) -> Option<&EverdoId> {
        self.source_to_target.get(&source)
    }

    pub fn slot_of(&self, target: &EverdoId) -> Option<Slot> {
        self.target_to_slot.get(target).copied()
    }

    /// Resolve a source id all the way to the entity's storage slot
    pub fn resolve(&self, source: SourceKey) -> Option<Slot> {
        self.target_of(source).and_then(|t| self.slot_of(t))
    }

    pub fn len(&self) -> usize {
        self.source_to_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_to_target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let mut xref = CrossReference::new();
        let first = EverdoId::generate();
        let second = EverdoId::generate();

        assert!(xref.associate(SourceKey::Item(1), first.clone()));
        assert!(!xref.associate(SourceKey::Item(1), second));
        assert_eq!(xref.target_of(SourceKey::Item(1)), Some(&first));
        assert_eq!(xref.len(), 1);
    }

    #[test]
    fn test_keys_are_namespaced() {
        let mut xref = CrossReference::new();
        let label = EverdoId::generate();
        let item = EverdoId::generate();
        xref.associate(SourceKey::Label(7), label.clone());
        xref.associate(SourceKey::Item(7), item.clone());

        assert_eq!(xref.target_of(SourceKey::Label(7)), Some(&label));
        assert_eq!(xref.target_of(SourceKey::Item(7)), Some(&item));
        assert_eq!(xref.target_of(SourceKey::Project(7)), None);
    }

    #[test]
    fn test_resolve_through_slot() {
        let mut xref = CrossReference::new();
        let id = EverdoId::generate();
        xref.associate(SourceKey::Project(3), id.clone());
        assert_eq!(xref.resolve(SourceKey::Project(3)), None);

        xref.place(id, Slot::Item(4));
        assert_eq!(xref.resolve(SourceKey::Project(3)), Some(Slot::Item(4)));
        assert!(xref.resolve(SourceKey::Item(3)).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceKey::Label(5).to_string(), "label 5");
        assert_eq!(SourceKey::Item(9).to_string(), "item 9");
    }
}

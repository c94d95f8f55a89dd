//! Read-only snapshot of a Todoist account
//!
//! The snapshot is fetched in full before translation starts, so the export
//! works on a consistent view. It offers the named-group queries the export
//! passes need: projects by name, labels by name, child projects and items.

use super::forest::ProjectForest;
use super::model::{SourceItem, SourceLabel, SourceNote, SourceProject};
use crate::error::{ExportError, Result};
use anyhow::Context as _;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Raw full-sync payload
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFile {
    projects: Vec<SourceProject>,
    items: Vec<SourceItem>,
    labels: Vec<SourceLabel>,
    notes: Vec<SourceNote>,
}

/// In-memory Todoist account with lookup indexes
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    projects: Vec<SourceProject>,
    items: Vec<SourceItem>,
    labels: Vec<SourceLabel>,
    notes: Vec<SourceNote>,
    forest: ProjectForest,
    /// Project id to item indices, ordered by `item_order`
    items_by_project: HashMap<u64, Vec<usize>>,
    item_index: HashMap<u64, usize>,
}

impl Snapshot {
    /// Assemble a snapshot and build its indexes
    pub fn new(
        projects: Vec<SourceProject>,
        items: Vec<SourceItem>,
        labels: Vec<SourceLabel>,
        notes: Vec<SourceNote>,
    ) -> Self {
        let forest = ProjectForest::build(&projects);

        let mut items_by_project: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut item_index = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            items_by_project.entry(item.project_id).or_default().push(idx);
            item_index.entry(item.id).or_insert(idx);
        }
        for indices in items_by_project.values_mut() {
            indices.sort_by_key(|&i| items[i].item_order);
        }

        Self {
            projects,
            items,
            labels,
            notes,
            forest,
            items_by_project,
            item_index,
        }
    }

    /// Parse a snapshot from the JSON full-sync shape
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: SnapshotFile = serde_json::from_str(content)?;
        Ok(Self::new(raw.projects, raw.items, raw.labels, raw.notes))
    }

    /// Load a snapshot file from disk
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot = Self::from_json(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    pub fn projects(&self) -> &[SourceProject] {
        &self.projects
    }

    pub fn items(&self) -> &[SourceItem] {
        &self.items
    }

    pub fn labels(&self) -> &[SourceLabel] {
        &self.labels
    }

    pub fn notes(&self) -> &[SourceNote] {
        &self.notes
    }

    pub fn forest(&self) -> &ProjectForest {
        &self.forest
    }

    /// Find the single project with the given name
    ///
    /// Names are compared after trimming surrounding whitespace.
    ///
    /// # Arguments
    /// * `name` - Project name to look up
    ///
    /// # Returns
    /// The project, `ProjectNotFound` when nothing matches, or
    /// `DuplicateProject` when the name is ambiguous
    pub fn project_by_name(&self, name: &str) -> Result<&SourceProject> {
        let name = name.trim();
        let matches: Vec<&SourceProject> = self
            .projects
            .iter()
            .filter(|p| p.name.trim() == name)
            .collect();

        match matches.as_slice() {
            [] => Err(ExportError::ProjectNotFound(name.to_string())),
            [project] => Ok(*project),
            _ => Err(ExportError::DuplicateProject {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Resolve every name of a configured root list, failing on the first miss
    pub fn projects_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&SourceProject>> {
        names
            .iter()
            .map(|n| self.project_by_name(n.as_ref()))
            .collect()
    }

    /// Look up a label id by name, ignoring case
    pub fn label_id_by_name(&self, name: &str) -> Option<u64> {
        let name = name.to_lowercase();
        self.labels
            .iter()
            .find(|l| !l.is_deleted && l.name.to_lowercase() == name)
            .map(|l| l.id)
    }

    pub fn label_by_id(&self, id: u64) -> Option<&SourceLabel> {
        self.labels.iter().find(|l| l.id == id)
    }

    pub fn item_by_id(&self, id: u64) -> Option<&SourceItem> {
        self.item_index.get(&id).map(|&i| &self.items[i])
    }

    /// All projects nested below the given one, in global order
    pub fn child_projects(&self, project_id: u64) -> Vec<&SourceProject> {
        self.forest
            .descendants_of(project_id)
            .into_iter()
            .map(|i| &self.projects[i])
            .collect()
    }

    /// Items that live directly in the given project, in project order
    pub fn child_items(&self, project_id: u64) -> Vec<&SourceItem> {
        self.items_by_project
            .get(&project_id)
            .map(|indices| indices.iter().map(|&i| &self.items[i]).collect())
            .unwrap_or_default()
    }
}

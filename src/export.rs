//! Export driver
//!
//! Runs the passes in a fixed order over one snapshot:
//! tags, inbox, active tree, someday tree, other projects, notebooks, comments.
//! Fatal errors abort the run; skipped records are counted in the summary.

use crate::builder::{self, BuiltItem, EntityBuilder};
use crate::classify::{self, Branch, Classifier, Tree, Verdict};
use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::everdo::{EverdoFile, EverdoId, EverdoItem, ItemType, ListType, SourceKey};
use crate::source::{Snapshot, SourceItem, SourceProject};
use crate::timestamp::ExportClock;
use std::fmt;

/// Counts collected during one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub tags: usize,
    pub areas: usize,
    pub inbox_items: usize,
    pub active_projects: usize,
    pub active_items: usize,
    pub standalone_items: usize,
    pub someday_projects: usize,
    pub someday_items: usize,
    pub someday_standalone_items: usize,
    pub other_projects: usize,
    pub other_items: usize,
    pub notebooks: usize,
    pub notebook_notes: usize,
    pub comments: usize,
    /// Headings folded into their owner's note body
    pub folded_titles: usize,
    /// Comments whose item was never converted
    pub skipped_references: usize,
    /// Headings with no owning project to fold into
    pub orphan_titles: usize,
    pub due_date_mismatches: usize,
    pub unresolved_markers: usize,
    /// Deleted labels still attached to exported items
    pub deleted_labels: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tags: {} ({} areas)", self.tags + self.areas, self.areas)?;
        writeln!(f, "Inbox items: {}", self.inbox_items)?;
        writeln!(
            f,
            "Active projects: {}, with {} items ({} standalone)",
            self.active_projects, self.active_items, self.standalone_items
        )?;
        writeln!(
            f,
            "Someday projects: {}, with {} items ({} standalone)",
            self.someday_projects, self.someday_items, self.someday_standalone_items
        )?;
        writeln!(
            f,
            "Other projects: {}, with {} items",
            self.other_projects, self.other_items
        )?;
        writeln!(
            f,
            "Notebooks: {}, with {} notes",
            self.notebooks, self.notebook_notes
        )?;
        writeln!(f, "Comments: {}", self.comments)?;
        write!(
            f,
            "Skipped: {} dangling comments, {} orphan headings, {} due date mismatches, \
             {} unknown inline labels, {} deleted labels",
            self.skipped_references,
            self.orphan_titles,
            self.due_date_mismatches,
            self.unresolved_markers,
            self.deleted_labels
        )
    }
}

/// One export pass over a snapshot
pub struct Exporter<'a> {
    snapshot: &'a Snapshot,
    config: &'a Config,
    classifier: Classifier<'a>,
    clock: ExportClock,
    file: EverdoFile,
    summary: ExportSummary,
}

impl<'a> Exporter<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a Config, clock: ExportClock) -> Self {
        Self {
            snapshot,
            config,
            classifier: Classifier::new(snapshot, config, clock),
            clock,
            file: EverdoFile::new(),
            summary: ExportSummary::default(),
        }
    }

    /// Run every pass and hand back the finished document
    ///
    /// # Returns
    /// The document and its summary, or the first fatal error
    pub fn run(mut self) -> Result<(EverdoFile, ExportSummary)> {
        self.config.validate()?;

        self.add_tags()?;
        self.add_inbox()?;
        self.add_active_projects()?;
        self.add_someday()?;
        let config = self.config;
        for name in &config.other_projects {
            self.add_other_project(name)?;
        }
        for name in &config.notebooks {
            self.add_notebook(name)?;
        }
        self.add_comments();

        tracing::info!(
            "Exported {} items and {} tags",
            self.file.items().len(),
            self.file.tags().len()
        );
        Ok((self.file, self.summary))
    }

    fn builder(&self) -> EntityBuilder<'_> {
        EntityBuilder::new(self.config, &self.classifier, self.clock)
    }

    /// Every live label becomes a tag
    pub fn add_tags(&mut self) -> Result<()> {
        let mut count = 0;
        for label in self.snapshot.labels() {
            if label.is_deleted {
                continue;
            }
            let tag = self.builder().label_tag(label)?;
            tracing::debug!(
                "Label {} -> tag '{}' of type '{}'",
                label.id,
                tag.title(),
                tag.kind()
            );
            self.file.add_tag(tag, Some(SourceKey::Label(label.id)));
            count += 1;
        }
        self.summary.tags += count;
        tracing::info!("Added {} tags", count);
        Ok(())
    }

    /// Items of the inbox project go to the inbox
    pub fn add_inbox(&mut self) -> Result<()> {
        let snapshot = self.snapshot;
        let inbox = snapshot.project_by_name(&self.config.inbox_project)?;
        let mut count = 0;
        for item in snapshot.child_items(inbox.id) {
            if self.add_inbox_item(item)? {
                count += 1;
            }
        }
        self.summary.inbox_items += count;
        tracing::info!("Added {} items from {}", count, inbox.name.trim());
        Ok(())
    }

    /// Active tree: each root becomes an area, every nested project a project
    pub fn add_active_projects(&mut self) -> Result<()> {
        let snapshot = self.snapshot;
        let roots = snapshot.projects_by_names(&self.config.target_projects)?;
        for root in roots {
            let area = self.builder().area_tag(root)?;
            // Areas are not looked up by source id, so the root stays unregistered
            let area_id = self.file.add_tag(area, None);
            self.summary.areas += 1;

            let (mut projects, mut items) = (0, 0);
            for project in snapshot.child_projects(root.id) {
                let Some(eproject) = self.add_container(
                    project,
                    Tree::Active,
                    ItemType::Project,
                    vec![area_id.clone()],
                )?
                else {
                    continue;
                };
                projects += 1;
                items +=
                    self.add_project_items(project, &eproject, Branch::Project, ItemType::Action)?;
            }

            let standalone = self.add_standalone_items(root, Branch::Standalone(None))?;
            self.summary.active_projects += projects;
            self.summary.active_items += items;
            self.summary.standalone_items += standalone;
            tracing::info!(
                "Added {} active projects from {}, with {} items",
                projects,
                root.name.trim(),
                items
            );
            tracing::info!("Added {} standalone items", standalone);
        }
        Ok(())
    }

    /// Someday tree: nested projects become someday projects, scheduled when
    /// any open item has a due date
    pub fn add_someday(&mut self) -> Result<()> {
        let snapshot = self.snapshot;
        let roots = snapshot.projects_by_names(&self.config.someday_projects)?;
        for root in roots {
            let (mut projects, mut items) = (0, 0);
            for project in snapshot.child_projects(root.id) {
                let Some(eproject) =
                    self.add_container(project, Tree::Someday, ItemType::Project, Vec::new())?
                else {
                    continue;
                };
                projects += 1;
                items += self.add_project_items(
                    project,
                    &eproject,
                    Branch::SomedayProject,
                    ItemType::Action,
                )?;
            }

            let standalone = self.add_standalone_items(
                root,
                Branch::Standalone(Some(ListType::Someday)),
            )?;
            self.summary.someday_projects += projects;
            self.summary.someday_items += items;
            self.summary.someday_standalone_items += standalone;
            tracing::info!(
                "Added {} someday projects from {}, with {} items",
                projects,
                root.name.trim(),
                items
            );
            tracing::info!("Added {} standalone someday items", standalone);
        }
        Ok(())
    }

    /// Copy one named project as a plain active project
    ///
    /// Nested projects are not copied; they are reported so they can be
    /// handled by hand after the import.
    pub fn add_other_project(&mut self, name: &str) -> Result<()> {
        let project = self.snapshot.project_by_name(name)?;
        if !self.check_copyable(project) {
            return Ok(());
        }
        let Some(eproject) =
            self.add_container(project, Tree::Active, ItemType::Project, Vec::new())?
        else {
            return Ok(());
        };
        let items = self.add_project_items(project, &eproject, Branch::Project, ItemType::Action)?;
        self.summary.other_projects += 1;
        self.summary.other_items += items;
        tracing::info!("Copied project {} with {} items", project.name.trim(), items);
        Ok(())
    }

    /// Copy one named project as a notebook, its items becoming notes
    pub fn add_notebook(&mut self, name: &str) -> Result<()> {
        let project = self.snapshot.project_by_name(name)?;
        if !self.check_copyable(project) {
            return Ok(());
        }
        let Some(notebook) =
            self.add_container(project, Tree::Active, ItemType::Notebook, Vec::new())?
        else {
            return Ok(());
        };
        let notes = self.add_project_items(project, &notebook, Branch::Project, ItemType::Note)?;
        self.summary.notebooks += 1;
        self.summary.notebook_notes += notes;
        tracing::info!("Copied notebook {} with {} notes", project.name.trim(), notes);
        Ok(())
    }

    /// Merge Todoist comments into the note body of their converted item
    pub fn add_comments(&mut self) {
        let snapshot = self.snapshot;
        let mut count = 0;
        for note in snapshot.notes() {
            if note.is_deleted || note.is_archived || note.content.trim().is_empty() {
                continue;
            }
            match builder::merge_comment(&mut self.file, note) {
                Ok(()) => count += 1,
                Err(e) => {
                    let preview = snapshot
                        .item_by_id(note.item_id)
                        .map(|i| preview_text(&i.content))
                        .unwrap_or_default();
                    tracing::warn!(
                        "Can't find converted item {} ({}) for note: {} ({})",
                        note.item_id,
                        preview,
                        preview_text(&note.content),
                        e
                    );
                    self.summary.skipped_references += 1;
                }
            }
        }
        self.summary.comments += count;
        tracing::info!("Added {} notes", count);
    }

    /// Warn about named projects that cannot be copied as-is
    fn check_copyable(&self, project: &SourceProject) -> bool {
        if !self.snapshot.forest().children_of(project.id).is_empty() {
            tracing::warn!(
                "{} has child projects; they are not copied",
                project.name.trim()
            );
        }
        if project.is_deleted {
            tracing::warn!("{} is deleted; skipping it", project.name.trim());
            return false;
        }
        true
    }

    /// Build and register a project or notebook
    ///
    /// # Returns
    /// The Everdo id, or `None` when the project is deleted
    fn add_container(
        &mut self,
        project: &SourceProject,
        tree: Tree,
        kind: ItemType,
        tags: Vec<EverdoId>,
    ) -> Result<Option<EverdoId>> {
        let Some((list, completed_on)) = self.classifier.classify_project(project, tree) else {
            tracing::debug!("Skipping deleted project {}", project.id);
            return Ok(None);
        };
        let item = self.builder().container(project, kind, list, completed_on, tags)?;
        Ok(Some(
            self.file.add_item(item, Some(SourceKey::Project(project.id))),
        ))
    }

    /// Export the items of one project under its Everdo counterpart
    ///
    /// Headings are folded into the owner's note body and their ids aliased to
    /// the owner, so comments on them still find a home.
    ///
    /// # Returns
    /// Number of items converted into their own entity
    fn add_project_items(
        &mut self,
        project: &SourceProject,
        owner: &EverdoId,
        branch: Branch,
        kind: ItemType,
    ) -> Result<usize> {
        let snapshot = self.snapshot;
        let mut count = 0;
        for item in snapshot.child_items(project.id) {
            let verdict = self.classifier.classify_item(item, branch)?;
            self.check_due_date(item, &verdict);
            match verdict {
                Verdict::Skip => {}
                Verdict::Fold { schedules_owner } => {
                    let eowner = self.owner_mut(owner)?;
                    if let Some(start) = schedules_owner {
                        eowner.schedule_from(start)?;
                    }
                    eowner.append_note(&item.content);
                    self.file.alias(SourceKey::Item(item.id), owner);
                    self.summary.folded_titles += 1;
                }
                Verdict::Convert(placement) => {
                    if let Some(start) = placement.schedules_owner {
                        self.owner_mut(owner)?.schedule_from(start)?;
                    }
                    let built = self
                        .builder()
                        .leaf(item, &placement, kind, Some(owner), &self.file)?;
                    self.add_built(item, built);
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Export the items sitting directly under a root as standalone actions
    fn add_standalone_items(&mut self, root: &SourceProject, branch: Branch) -> Result<usize> {
        let snapshot = self.snapshot;
        let mut count = 0;
        for item in snapshot.child_items(root.id) {
            let verdict = self.classifier.classify_item(item, branch)?;
            self.check_due_date(item, &verdict);
            match verdict {
                Verdict::Skip => {}
                Verdict::Fold { .. } => {
                    tracing::warn!(
                        "Heading {} ({}) sits directly under {}; nothing to fold it into",
                        item.id,
                        preview_text(&item.content),
                        root.name.trim()
                    );
                    self.summary.orphan_titles += 1;
                }
                Verdict::Convert(placement) => {
                    let built = self
                        .builder()
                        .leaf(item, &placement, ItemType::Action, None, &self.file)?;
                    self.add_built(item, built);
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Export one inbox item
    ///
    /// # Returns
    /// `false` when the item was skipped
    fn add_inbox_item(&mut self, item: &SourceItem) -> Result<bool> {
        let verdict = self.classifier.classify_item(item, Branch::Inbox)?;
        self.check_due_date(item, &verdict);
        let Verdict::Convert(placement) = verdict else {
            return Ok(false);
        };
        let built = self
            .builder()
            .leaf(item, &placement, ItemType::Action, None, &self.file)?;
        self.add_built(item, built);
        Ok(true)
    }

    fn owner_mut(&mut self, owner: &EverdoId) -> Result<&mut EverdoItem> {
        self.file
            .item_mut(owner)
            .ok_or_else(|| ExportError::MissingReference(owner.to_string()))
    }

    /// Register a built item and count what was dropped while building it
    fn add_built(&mut self, item: &SourceItem, built: BuiltItem) {
        for marker in &built.unresolved_markers {
            tracing::debug!("No label named '{}' for marker on item {}", marker, item.id);
        }
        for label_id in &built.deleted_labels {
            tracing::warn!("Item {} carries deleted label {}; dropping it", item.id, label_id);
        }
        self.summary.unresolved_markers += built.unresolved_markers.len();
        self.summary.deleted_labels += built.deleted_labels.len();
        self.file.add_item(built.item, Some(SourceKey::Item(item.id)));
    }

    /// Count items that lose their due date; skipped items are not exported
    fn check_due_date(&mut self, item: &SourceItem, verdict: &Verdict) {
        if !matches!(verdict, Verdict::Skip) && classify::has_due_date_mismatch(item) {
            self.summary.due_date_mismatches += 1;
        }
    }
}

/// First 100 characters of a text on a single line
fn preview_text(text: &str) -> String {
    text.chars()
        .take(100)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

//! Explicit project hierarchy
//!
//! Todoist encodes project nesting implicitly: projects are globally ordered by
//! `item_order`, and a project's descendants are the contiguous run of
//! following projects with a strictly greater `indent`. The forest computes the
//! parent edges once, up front, so later queries are plain tree walks.
//!
//! Tie-breaks:
//! - projects sharing an `item_order` keep their input order (stable sort)
//! - when indent drops by several levels at once, the project attaches to the
//!   nearest preceding project with a smaller indent, or becomes a root
//! - when indent jumps by several levels, the project attaches to the
//!   immediately preceding shallower project

use super::model::SourceProject;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Node {
    project: usize,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena of project nodes in global order with explicit parent links
#[derive(Debug, Clone, Default)]
pub struct ProjectForest {
    /// Nodes in sorted order; `project` indexes into the snapshot's project list
    nodes: Vec<Node>,
    /// Project id to node index
    by_id: HashMap<u64, usize>,
}

impl ProjectForest {
    /// Build the forest from the snapshot's projects
    ///
    /// # Arguments
    /// * `projects` - All projects, in any order
    pub fn build(projects: &[SourceProject]) -> Self {
        let mut order: Vec<usize> = (0..projects.len()).collect();
        order.sort_by_key(|&i| projects[i].item_order);

        let mut nodes: Vec<Node> = Vec::with_capacity(order.len());
        let mut by_id = HashMap::with_capacity(order.len());
        // Chain of open ancestors, shallowest first
        let mut stack: Vec<usize> = Vec::new();

        for project_idx in order {
            let indent = projects[project_idx].indent;
            while let Some(&top) = stack.last() {
                if projects[nodes[top].project].indent < indent {
                    break;
                }
                stack.pop();
            }

            let node_idx = nodes.len();
            let parent = stack.last().copied();
            if let Some(parent_idx) = parent {
                nodes[parent_idx].children.push(node_idx);
            }
            nodes.push(Node {
                project: project_idx,
                parent,
                children: Vec::new(),
            });
            by_id.entry(projects[project_idx].id).or_insert(node_idx);
            stack.push(node_idx);
        }

        Self { nodes, by_id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of the direct children of a project in global order
    pub fn children_of(&self, project_id: u64) -> Vec<usize> {
        self.by_id
            .get(&project_id)
            .map(|&node| {
                self.nodes[node]
                    .children
                    .iter()
                    .map(|&c| self.nodes[c].project)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Indices of every descendant of a project, pre-order
    ///
    /// This is the contiguous run of deeper projects that follows the project
    /// in global order. An unknown id has no descendants.
    pub fn descendants_of(&self, project_id: u64) -> Vec<usize> {
        let mut out = Vec::new();
        let Some(&start) = self.by_id.get(&project_id) else {
            return out;
        };

        let mut pending: Vec<usize> = self.nodes[start].children.iter().rev().copied().collect();
        while let Some(node) = pending.pop() {
            out.push(self.nodes[node].project);
            pending.extend(self.nodes[node].children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl ProjectForest {
        fn parent_of(&self, project_id: u64) -> Option<usize> {
            let node = *self.by_id.get(&project_id)?;
            self.nodes[node].parent.map(|p| self.nodes[p].project)
        }

        fn roots(&self) -> Vec<usize> {
            self.nodes
                .iter()
                .filter(|n| n.parent.is_none())
                .map(|n| n.project)
                .collect()
        }
    }

    fn project(id: u64, name: &str, indent: u32, item_order: i64) -> SourceProject {
        SourceProject {
            id,
            name: name.to_string(),
            indent,
            item_order,
            ..Default::default()
        }
    }

    fn names(projects: &[SourceProject], idx: Vec<usize>) -> Vec<&str> {
        idx.into_iter().map(|i| projects[i].name.as_str()).collect()
    }

    #[test]
    fn test_simple_nesting() {
        let projects = vec![
            project(1, "GTD", 1, 1),
            project(2, "Work", 2, 2),
            project(3, "Report", 3, 3),
            project(4, "Home", 2, 4),
            project(5, "Someday", 1, 5),
        ];
        let forest = ProjectForest::build(&projects);

        assert_eq!(names(&projects, forest.roots()), vec!["GTD", "Someday"]);
        assert_eq!(names(&projects, forest.children_of(1)), vec!["Work", "Home"]);
        assert_eq!(
            names(&projects, forest.descendants_of(1)),
            vec!["Work", "Report", "Home"]
        );
        assert!(forest.descendants_of(5).is_empty());
        assert_eq!(forest.parent_of(3), Some(1));
        assert_eq!(forest.parent_of(1), None);
    }

    #[test]
    fn test_zero_based_indent() {
        let projects = vec![
            project(1, "GTD", 0, 1),
            project(2, "Work", 1, 2),
            project(3, "Inbox", 0, 3),
        ];
        let forest = ProjectForest::build(&projects);

        assert_eq!(names(&projects, forest.roots()), vec!["GTD", "Inbox"]);
        assert_eq!(forest.parent_of(2), Some(0));
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let projects = vec![
            project(4, "Home", 2, 4),
            project(1, "GTD", 1, 1),
            project(3, "Report", 3, 3),
            project(2, "Work", 2, 2),
        ];
        let forest = ProjectForest::build(&projects);
        assert_eq!(
            names(&projects, forest.descendants_of(1)),
            vec!["Work", "Report", "Home"]
        );
    }

    #[test]
    fn test_equal_order_keeps_input_order() {
        let projects = vec![
            project(1, "Root", 1, 1),
            project(2, "B", 2, 5),
            project(3, "A", 2, 5),
        ];
        let forest = ProjectForest::build(&projects);
        assert_eq!(names(&projects, forest.children_of(1)), vec!["B", "A"]);
    }

    #[test]
    fn test_multi_level_indent_drop() {
        let projects = vec![
            project(1, "Root", 1, 1),
            project(2, "L2", 2, 2),
            project(3, "L3", 3, 3),
            project(4, "L4", 4, 4),
            project(5, "Next", 2, 5),
            project(6, "Other", 1, 6),
        ];
        let forest = ProjectForest::build(&projects);
        assert_eq!(names(&projects, forest.children_of(1)), vec!["L2", "Next"]);
        assert_eq!(forest.parent_of(6), None);
        assert_eq!(forest.descendants_of(1).len(), 4);
    }

    #[test]
    fn test_indent_gap_attaches_to_preceding() {
        let projects = vec![project(1, "Root", 1, 1), project(2, "Deep", 4, 2)];
        let forest = ProjectForest::build(&projects);
        assert_eq!(forest.parent_of(2), Some(0));
    }

    #[test]
    fn test_unknown_project() {
        let forest = ProjectForest::build(&[]);
        assert!(forest.is_empty());
        assert!(forest.descendants_of(42).is_empty());
        assert!(forest.children_of(42).is_empty());
        assert_eq!(forest.parent_of(42), None);
    }
}

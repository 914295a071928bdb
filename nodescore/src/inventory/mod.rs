//! Node inventory snapshot: which tasks are currently placed on each node.
//!
//! The scoring core only *reads* from the inventory through the
//! [`NodeInfoLister`] trait.  [`InventorySnapshot`] is the in-memory
//! implementation used by the host binary and the tests; a scheduler host can
//! plug in its own lister backed by a live cache.
//!
//! The expected YAML structure is:
//! ```yaml
//! nodes:
//!   node01:
//!     tasks:
//!       - id: default/web-1
//!         labels:
//!           app: web
//!       - id: default/db-0
//!         labels:
//!           app: db
//!   node02:
//!     tasks: []
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::task::Task;

// ── Error type ────────────────────────────────────────────────────────────────

/// Lookup failures reported by a [`NodeInfoLister`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The node is not part of the snapshot, e.g. it was removed from the
    /// cluster between filtering and scoring.
    #[error("node '{node}' not found in inventory snapshot")]
    NodeNotFound { node: String },
}

// ── Accessor trait ────────────────────────────────────────────────────────────

/// Read-only view of the cluster's per-node task assignments.
///
/// Implementations must be safe to share between scoring workers.  Entries
/// are handed out as `Arc`s so a lister can keep its map behind a lock and
/// still return an entry after the guard is dropped.
pub trait NodeInfoLister: Send + Sync {
    /// Returns the current entry for `node`.
    fn node_info(&self, node: &str) -> Result<Arc<NodeInfo>, InventoryError>;
}

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    nodes: HashMap<String, NodeEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeEntry {
    #[serde(default)]
    tasks: Vec<Task>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Tasks currently assigned to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Builder-style helper that places `task` on this node.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

// ── InventorySnapshot ─────────────────────────────────────────────────────────

/// Immutable point-in-time inventory.
///
/// Wrap it in an `Arc` and share it with every strategy that reads it; the
/// snapshot is never mutated during a scoring pass.
#[derive(Debug, Default)]
pub struct InventorySnapshot {
    nodes: HashMap<String, Arc<NodeInfo>>,
}

impl InventorySnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from already-constructed node entries.
    ///
    /// A later entry with the same name replaces an earlier one.
    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeInfo>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|n| (n.name.clone(), Arc::new(n)))
                .collect(),
        }
    }

    /// Parses `path` into a snapshot.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is structurally
    /// invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading inventory snapshot from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open inventory file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse inventory file: {}", path.display()))
    }

    /// Parses an inventory document held in memory.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: InventoryFile =
            serde_yaml::from_str(content).context("invalid inventory YAML")?;

        let mut nodes = HashMap::with_capacity(file.nodes.len());
        for (name, entry) in file.nodes {
            debug!(node = %name, tasks = entry.tasks.len(), "inventory node");
            nodes.insert(
                name.clone(),
                Arc::new(NodeInfo {
                    name,
                    tasks: entry.tasks,
                }),
            );
        }

        if nodes.is_empty() {
            warn!("Inventory snapshot contains no nodes");
        } else {
            info!(node_count = nodes.len(), "Inventory snapshot loaded");
        }

        Ok(Self { nodes })
    }

    /// Names of every node in the snapshot, sorted for deterministic output.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeInfoLister for InventorySnapshot {
    fn node_info(&self, node: &str) -> Result<Arc<NodeInfo>, InventoryError> {
        self.nodes.get(node).cloned().ok_or_else(|| InventoryError::NodeNotFound {
            node: node.to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_inventory_yaml() {
        let yaml = r#"
nodes:
  node01:
    tasks:
      - id: default/web-1
        labels:
          app: web
      - id: default/db-0
        labels:
          app: db
  node02:
    tasks: []
  node03: {}
"#;
        let f = yaml_tempfile(yaml);
        let snapshot = InventorySnapshot::load_from_file(f.path()).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.node_names(), vec!["node01", "node02", "node03"]);

        let n1 = snapshot.node_info("node01").unwrap();
        assert_eq!(n1.name, "node01");
        assert_eq!(n1.tasks.len(), 2);
        assert_eq!(n1.tasks[0].label("app"), Some("web"));

        assert!(snapshot.node_info("node02").unwrap().tasks.is_empty());
        assert!(snapshot.node_info("node03").unwrap().tasks.is_empty());
    }

    #[test]
    fn task_without_labels_parses() {
        let yaml = "nodes:\n  n1:\n    tasks:\n      - id: bare\n";
        let snapshot = InventorySnapshot::from_yaml_str(yaml).unwrap();
        let n1 = snapshot.node_info("n1").unwrap();
        let task = &n1.tasks[0];
        assert_eq!(task.id, "bare");
        assert!(task.labels.is_empty());
    }

    #[test]
    fn unknown_node_is_a_lookup_error() {
        let snapshot = InventorySnapshot::from_nodes([NodeInfo::new("a")]);
        let err = snapshot.node_info("gone").unwrap_err();
        assert_eq!(
            err,
            InventoryError::NodeNotFound {
                node: "gone".to_string()
            }
        );
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn empty_document_gives_empty_snapshot() {
        let snapshot = InventorySnapshot::from_yaml_str("nodes: {}\n").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = InventorySnapshot::load_from_file(Path::new("/nonexistent/inventory.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(InventorySnapshot::load_from_file(f.path()).is_err());
    }
}

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Workload-density scorer (`PodState`).
//!
//! Favors nodes running fewer tasks of the same kind as the one being
//! placed.  Two tasks are the same kind when their values for the density
//! label (default `app`) are exactly equal, where "label absent" is a value of
//! its own:
//!
//! | scoring task | placed task | same kind |
//! |---|---|---|
//! | `app=web` | `app=web` | yes |
//! | `app=web` | `app=db` | no |
//! | *(absent)* | *(absent)* | yes |
//! | *(absent)* | `app=""` | no |
//!
//! `raw = 100 - same_kind_count`, which goes negative beyond 100 same-kind
//! tasks.  That is left to the normalizer; nothing is clamped here.

use std::sync::Arc;

use tracing::debug;

use crate::config::ScoringConfig;
use crate::framework::{Plugin, ScoreError, ScorePlugin};
use crate::inventory::{NodeInfo, NodeInfoLister};
use crate::task::{RawScore, Task};

/// Registry name.
pub const NAME: &str = "PodState";

/// Label compared when no other key is configured.
pub const DEFAULT_LABEL_KEY: &str = "app";

/// Score of a node with no same-kind tasks.
const EMPTY_NODE_SCORE: RawScore = 100;

/// Density scorer backed by a shared inventory snapshot.
pub struct DensityScorer {
    inventory: Arc<dyn NodeInfoLister>,
    label_key: String,
}

impl DensityScorer {
    pub fn new(inventory: Arc<dyn NodeInfoLister>) -> Self {
        Self {
            inventory,
            label_key: DEFAULT_LABEL_KEY.to_string(),
        }
    }

    /// Compare `key` instead of `app`.
    pub fn with_label_key(mut self, key: impl Into<String>) -> Self {
        self.label_key = key.into();
        self
    }

    pub fn label_key(&self) -> &str {
        &self.label_key
    }

    /// Number of tasks on `node` of the same kind as `task`.
    pub fn same_kind_count(&self, task: &Task, node: &NodeInfo) -> usize {
        let kind = task.label(&self.label_key);
        node.tasks
            .iter()
            .filter(|placed| placed.label(&self.label_key) == kind)
            .count()
    }

    /// Raw score of an already-resolved inventory entry.
    pub fn score_node_info(&self, task: &Task, node: &NodeInfo) -> RawScore {
        let count = i64::try_from(self.same_kind_count(task, node)).unwrap_or(i64::MAX);
        EMPTY_NODE_SCORE.saturating_sub(count)
    }
}

/// [`PluginFactory`](crate::framework::PluginFactory) for the registry.
pub fn factory(config: &ScoringConfig, inventory: Arc<dyn NodeInfoLister>) -> Arc<dyn ScorePlugin> {
    Arc::new(DensityScorer::new(inventory).with_label_key(config.density_label_key.clone()))
}

impl Plugin for DensityScorer {
    fn name(&self) -> &str {
        NAME
    }
}

impl ScorePlugin for DensityScorer {
    fn score(&self, task: &Task, node: &str) -> Result<RawScore, ScoreError> {
        let info = self.inventory.node_info(node)?;
        let score = self.score_node_info(task, &info);
        debug!(node = %node, task = %task.id, score, "density score");
        Ok(score)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

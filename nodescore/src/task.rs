/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures shared by every scoring strategy.
//!
//! ```text
//! scheduler ──(Task + candidates)──►  ScorePlugin::score  ──►  NodeScoreList (raw)
//!                                                                   │
//!            aggregator  ◄──(NodeScoreList, 0..=100)──  ScorePlugin::normalize
//! ```
//!
//! # Ownership model
//! A [`Task`] is owned by the external scheduler and is only borrowed (or
//! shared behind an `Arc`) for the duration of one scoring pass.  A
//! [`NodeScoreList`] is created fresh per (task, strategy) pass, moved into
//! the normalizer and moved out again, then handed to the aggregator.  It is
//! never reused across tasks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Score range ───────────────────────────────────────────────────────────────

/// Lowest canonical score a node can receive after normalization.
pub const MIN_NODE_SCORE: i64 = 0;

/// Highest canonical score a node can receive after normalization.
pub const MAX_NODE_SCORE: i64 = 100;

/// Strategy-specific score for one node, before normalization.
///
/// The range and sign are up to the strategy; it may lie outside
/// `[MIN_NODE_SCORE, MAX_NODE_SCORE]`.
pub type RawScore = i64;

// ── Task ──────────────────────────────────────────────────────────────────────

/// A workload unit waiting for placement.
///
/// Immutable for the duration of one scheduling decision.  Labels classify
/// tasks into "kinds"; keys are unique by construction of the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier of the task (e.g. `namespace/name`).
    pub id: String,

    /// Key–value labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Task {
    /// Create a task with no labels.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Builder-style helper that adds one label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns the value of `key`, or `None` when the label is absent.
    ///
    /// An absent label is distinct from a label set to the empty string.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

// ── NodeScore ─────────────────────────────────────────────────────────────────

/// Score of a single candidate node for one strategy and one task.
///
/// Holds a [`RawScore`] before normalization and a canonical score in
/// `[MIN_NODE_SCORE, MAX_NODE_SCORE]` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

impl NodeScore {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// One entry per candidate node, in candidate-list order.
pub type NodeScoreList = Vec<NodeScore>;

// ── Tests ─────────────────────────────────────────────────────────────────────

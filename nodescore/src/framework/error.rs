/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the scoring framework.
//!
//! Two layers, mirroring the two passes of a scoring run:
//!
//! * [`MalformedReason`]: why a [`NodeScoreList`] cannot be normalized
//!   (structural, a contract violation inside the pipeline).
//! * [`ScoreError`]: every failure a strategy or the pipeline can report.
//!
//! A degenerate score range (every node tied) is **not** an error; see
//! [`normalize`](super::normalize).
//!
//! [`NodeScoreList`]: crate::task::NodeScoreList

use std::fmt;

use thiserror::Error;

use crate::inventory::InventoryError;

// ── Structural problems ───────────────────────────────────────────────────────

/// Detailed reason why a score list was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The list has no entries.
    Empty,

    /// The list does not hold exactly one entry per candidate node.
    LengthMismatch { expected: usize, actual: usize },

    /// The entry at `index` belongs to a different node than the candidate at
    /// the same position.
    NodeMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::Empty => write!(f, "score list is empty"),

            MalformedReason::LengthMismatch { expected, actual } => write!(
                f,
                "expected {} entries (one per candidate node) but found {}",
                expected, actual
            ),

            MalformedReason::NodeMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "entry {} is for node '{}' but candidate {} is '{}'",
                index, actual, index, expected
            ),
        }
    }
}

// ── Per-node failure ──────────────────────────────────────────────────────────

/// One node that a strategy could not score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub node: String,
    pub reason: String,
}

impl fmt::Display for NodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.node, self.reason)
    }
}

// ── Top-level error ───────────────────────────────────────────────────────────

/// Errors produced while scoring or normalizing.
///
/// | Variant | Scope |
/// |---|---|
/// | `InventoryUnavailable` | one node, one strategy |
/// | `WorkerFailed` | one node, one strategy |
/// | `NodeScoringFailed` | one strategy, one task |
/// | `MalformedScoreList` | one strategy, one task |
/// | `NoCandidates` | the whole task |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The node's inventory entry could not be resolved.
    ///
    /// Never conflated with a valid score of zero.
    #[error("inventory for node '{node}' unavailable: {reason}")]
    InventoryUnavailable { node: String, reason: String },

    /// Normalization input violated the one-entry-per-candidate contract.
    #[error("score list for task '{task}' is malformed: {reason}")]
    MalformedScoreList {
        task: String,
        reason: MalformedReason,
    },

    /// At least one node could not be scored by `plugin`; the strategy's
    /// contribution for this task is dropped.
    #[error(
        "plugin '{plugin}' failed to score {} node(s) for task '{task}': {}",
        .failures.len(),
        join_failures(.failures)
    )]
    NodeScoringFailed {
        plugin: String,
        task: String,
        failures: Vec<NodeFailure>,
    },

    /// The candidate node list was empty.
    #[error("no candidate nodes provided for task '{task}'")]
    NoCandidates { task: String },

    /// The worker scoring `node` panicked or was cancelled.
    #[error("scoring worker for node '{node}' failed: {reason}")]
    WorkerFailed { node: String, reason: String },
}

impl ScoreError {
    /// Name of the node this error is about, for per-node variants.
    pub fn node(&self) -> Option<&str> {
        match self {
            ScoreError::InventoryUnavailable { node, .. }
            | ScoreError::WorkerFailed { node, .. } => Some(node),
            _ => None,
        }
    }
}

impl From<InventoryError> for ScoreError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NodeNotFound { ref node } => ScoreError::InventoryUnavailable {
                node: node.clone(),
                reason: err.to_string(),
            },
        }
    }
}

fn join_failures(failures: &[NodeFailure]) -> String {
    failures
        .iter()
        .map(NodeFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Scoring-plugin contract.
//!
//! A strategy is a [`ScorePlugin`]: it produces one [`RawScore`] per
//! candidate node and then rescales the complete per-task list into the
//! canonical `[MIN_NODE_SCORE, MAX_NODE_SCORE]` range.  Strategies never see
//! each other's output; combining them is the aggregator's job, downstream of
//! [`ScoringPipeline`].
//!
//! The remaining extension points ([`PreFilterPlugin`], [`FilterPlugin`],
//! [`PreBindPlugin`]) are kept as placeholders.  No strategy in this crate
//! does any work there beyond logging.
//!
//! | Design point | Choice |
//! |---|---|
//! | Dispatch | Trait objects registered in an explicit, ordered [`Registry`] |
//! | Normalization | Owned list in, owned list out; shared min–max default |
//! | Failure signal | `Result<_, ScoreError>`, never a sentinel score |
//! | Thread safety | Every plugin is `Send + Sync` |
//!
//! [`MIN_NODE_SCORE`]: crate::task::MIN_NODE_SCORE
//! [`MAX_NODE_SCORE`]: crate::task::MAX_NODE_SCORE

pub mod error;
pub mod normalize;
pub mod pipeline;

pub use error::{MalformedReason, NodeFailure, ScoreError};
pub use pipeline::{PluginFactory, Registry, ScoreReport, ScoringPipeline, StrategyScores};

use crate::task::{NodeScoreList, RawScore, Task};

/// Common identity of every plugin.
pub trait Plugin: Send + Sync {
    /// Name used in the registry, configuration and log lines.
    fn name(&self) -> &str;
}

/// A node-scoring strategy.
pub trait ScorePlugin: Plugin {
    /// Raw, strategy-specific score of `node` for `task`.
    ///
    /// # Errors
    /// A per-node failure (e.g. [`ScoreError::InventoryUnavailable`]).  It
    /// must never be reported as a score of zero.
    fn score(&self, task: &Task, node: &str) -> Result<RawScore, ScoreError>;

    /// Rescale the complete raw list for one task into the canonical range.
    ///
    /// The default is the shared min–max rescale in [`normalize`]; overrides
    /// must keep one entry per node, in the same order.
    fn normalize(&self, task: &Task, scores: NodeScoreList) -> Result<NodeScoreList, ScoreError> {
        normalize::normalize_scores(scores).map_err(|reason| ScoreError::MalformedScoreList {
            task: task.id.clone(),
            reason,
        })
    }
}

/// Admission check run once per task before filtering.
pub trait PreFilterPlugin: Plugin {
    fn pre_filter(&self, task: &Task) -> Result<(), ScoreError>;
}

/// Binary feasibility check run per (task, node).
pub trait FilterPlugin: Plugin {
    fn filter(&self, task: &Task, node: &str) -> Result<(), ScoreError>;
}

/// Hook run after a node has been chosen, before the binding is committed.
pub trait PreBindPlugin: Plugin {
    fn pre_bind(&self, task: &Task, node: &str) -> Result<(), ScoreError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NodeScore;

    struct Fixed;

    impl Plugin for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
    }

    impl ScorePlugin for Fixed {
        fn score(&self, _task: &Task, node: &str) -> Result<RawScore, ScoreError> {
            Ok(node.len() as RawScore)
        }
    }

    #[test]
    fn default_normalize_uses_min_max() {
        let task = Task::new("t");
        let raw = vec![NodeScore::new("x", 1), NodeScore::new("yyy", 3)];
        let out = Fixed.normalize(&task, raw).unwrap();
        assert_eq!(out[0].score, 0);
        assert_eq!(out[1].score, 100);
    }

    #[test]
    fn default_normalize_reports_task_on_empty_list() {
        let task = Task::new("default/web");
        let err = Fixed.normalize(&task, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::MalformedScoreList {
                task: "default/web".to_string(),
                reason: MalformedReason::Empty,
            }
        );
    }
}

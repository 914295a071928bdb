/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Strategy registry and the per-task scoring pipeline.
//!
//! For one task and its filter-passed candidates, [`ScoringPipeline::run`]
//! walks the [`Registry`] in order and, per strategy:
//!
//! 1. scores every candidate on a bounded pool of blocking workers,
//! 2. re-assembles the raw scores in candidate order,
//! 3. normalizes the complete list (sequential, whole-list),
//! 4. verifies the list still holds exactly one entry per candidate.
//!
//! A failure in one strategy never affects another; the [`ScoreReport`]
//! carries one outcome per strategy for the aggregator.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::error::{MalformedReason, NodeFailure, ScoreError};
use super::{Plugin, ScorePlugin};
use crate::config::ScoringConfig;
use crate::inventory::NodeInfoLister;
use crate::task::{NodeScore, NodeScoreList, RawScore, Task};

// ── Registry ──────────────────────────────────────────────────────────────────

/// Builds a strategy from the scoring configuration and the shared inventory.
pub type PluginFactory = fn(&ScoringConfig, Arc<dyn NodeInfoLister>) -> Arc<dyn ScorePlugin>;

/// Explicit, ordered table of scoring strategies.
#[derive(Default, Clone)]
pub struct Registry {
    plugins: Vec<Arc<dyn ScorePlugin>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `plugin`; names must be unique.
    pub fn register(&mut self, plugin: Arc<dyn ScorePlugin>) -> Result<()> {
        if self.get(plugin.name()).is_some() {
            bail!("score plugin '{}' is already registered", plugin.name());
        }
        debug!(plugin = plugin.name(), "registered score plugin");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Instantiates every strategy listed in `config.strategies`, in order,
    /// using the matching entry of `factories`.
    ///
    /// # Errors
    /// An unknown or duplicated strategy name.
    pub fn from_config(
        config: &ScoringConfig,
        inventory: Arc<dyn NodeInfoLister>,
        factories: &[(&str, PluginFactory)],
    ) -> Result<Self> {
        let mut registry = Self::new();
        for name in &config.strategies {
            let Some((_, factory)) = factories.iter().find(|(n, _)| n == name) else {
                let known: Vec<&str> = factories.iter().map(|(n, _)| *n).collect();
                bail!("unknown score plugin '{}' (valid: {})", name, known.join(", "));
            };
            registry.register(factory(config, Arc::clone(&inventory)))?;
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ScorePlugin>> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    pub fn plugins(&self) -> &[Arc<dyn ScorePlugin>] {
        &self.plugins
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Outcome of one strategy for one task.
#[derive(Debug, Clone)]
pub struct StrategyScores {
    pub plugin: String,
    /// Normalized scores in candidate order, or why this strategy has no
    /// contribution for the task.
    pub outcome: Result<NodeScoreList, ScoreError>,
}

impl StrategyScores {
    /// Node name → normalized score, or `None` if the strategy failed.
    pub fn scores_by_node(&self) -> Option<BTreeMap<&str, i64>> {
        self.outcome
            .as_ref()
            .ok()
            .map(|list| list.iter().map(|s| (s.name.as_str(), s.score)).collect())
    }
}

/// Everything the aggregator needs for one task: one entry per registered
/// strategy, in registration order.
#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub task: String,
    pub strategies: Vec<StrategyScores>,
}

impl ScoreReport {
    pub fn get(&self, plugin: &str) -> Option<&StrategyScores> {
        self.strategies.iter().find(|s| s.plugin == plugin)
    }

    /// Shorthand for `get(plugin)?.scores_by_node()`.
    pub fn scores_by_node(&self, plugin: &str) -> Option<BTreeMap<&str, i64>> {
        self.get(plugin)?.scores_by_node()
    }

    pub fn successful(&self) -> impl Iterator<Item = &StrategyScores> {
        self.strategies.iter().filter(|s| s.outcome.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &StrategyScores> {
        self.strategies.iter().filter(|s| s.outcome.is_err())
    }
}

// ── ScoringPipeline ───────────────────────────────────────────────────────────

/// Runs every registered strategy for a task.
///
/// Holds no per-task state, so one pipeline can serve many tasks
/// concurrently.
pub struct ScoringPipeline {
    registry: Registry,
    parallelism: usize,
}

impl ScoringPipeline {
    /// `parallelism` bounds concurrent per-node score calls; `0` is treated
    /// as `1`.
    pub fn new(registry: Registry, parallelism: usize) -> Self {
        Self {
            registry,
            parallelism: parallelism.max(1),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Score `task` against `candidates` with every registered strategy.
    ///
    /// # Errors
    /// Only [`ScoreError::NoCandidates`]; strategy-level failures are kept
    /// inside the returned [`ScoreReport`].
    pub async fn run(&self, task: Arc<Task>, candidates: &[String]) -> Result<ScoreReport, ScoreError> {
        if candidates.is_empty() {
            return Err(ScoreError::NoCandidates {
                task: task.id.clone(),
            });
        }

        info!(
            task = %task.id,
            candidates = candidates.len(),
            strategies = self.registry.len(),
            "=== ScoringPipeline::run() ==="
        );

        let mut strategies = Vec::with_capacity(self.registry.len());
        for plugin in self.registry.plugins() {
            let outcome = self.run_plugin(plugin, &task, candidates).await;
            match &outcome {
                Ok(scores) => info!(plugin = plugin.name(), nodes = scores.len(), "✓ normalized"),
                Err(e) => warn!(plugin = plugin.name(), error = %e, "strategy dropped for task"),
            }
            strategies.push(StrategyScores {
                plugin: plugin.name().to_string(),
                outcome,
            });
        }

        Ok(ScoreReport {
            task: task.id.clone(),
            strategies,
        })
    }

    async fn run_plugin(
        &self,
        plugin: &Arc<dyn ScorePlugin>,
        task: &Arc<Task>,
        candidates: &[String],
    ) -> Result<NodeScoreList, ScoreError> {
        let raw = self.score_nodes(plugin, task, candidates).await?;
        let normalized = plugin.normalize(task, raw)?;
        verify_against_candidates(&task.id, candidates, &normalized)?;
        Ok(normalized)
    }

    /// Raw-score pass.  Every node is attempted even after a failure so the
    /// caller sees all per-node errors at once.
    async fn score_nodes(
        &self,
        plugin: &Arc<dyn ScorePlugin>,
        task: &Arc<Task>,
        candidates: &[String],
    ) -> Result<NodeScoreList, ScoreError> {
        let permits = Arc::new(Semaphore::new(self.parallelism));
        let mut workers = JoinSet::new();
        let mut worker_index = HashMap::with_capacity(candidates.len());

        for (index, node) in candidates.iter().enumerate() {
            let permit = Arc::clone(&permits).acquire_owned().await.map_err(|e| {
                ScoreError::WorkerFailed {
                    node: node.clone(),
                    reason: e.to_string(),
                }
            })?;
            let plugin = Arc::clone(plugin);
            let task = Arc::clone(task);
            let node = node.clone();

            let handle = workers.spawn_blocking(move || {
                let _permit = permit;
                (index, plugin.score(&task, &node))
            });
            worker_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<Result<RawScore, ScoreError>>> = vec![None; candidates.len()];
        while let Some(joined) = workers.join_next_with_id().await {
            match joined {
                Ok((_, (index, result))) => slots[index] = Some(result),
                Err(e) => {
                    if let Some(&index) = worker_index.get(&e.id()) {
                        slots[index] = Some(Err(ScoreError::WorkerFailed {
                            node: candidates[index].clone(),
                            reason: e.to_string(),
                        }));
                    }
                }
            }
        }

        let mut scores = NodeScoreList::with_capacity(candidates.len());
        let mut failures = Vec::new();
        for (node, slot) in candidates.iter().zip(slots) {
            match slot {
                Some(Ok(score)) => {
                    debug!(plugin = plugin.name(), node = %node, score, "raw score");
                    scores.push(NodeScore::new(node.clone(), score));
                }
                Some(Err(e)) => {
                    warn!(
                        plugin = plugin.name(),
                        node = e.node().unwrap_or(node),
                        error = %e,
                        "node scoring failed"
                    );
                    failures.push(NodeFailure {
                        node: node.clone(),
                        reason: e.to_string(),
                    });
                }
                None => failures.push(NodeFailure {
                    node: node.clone(),
                    reason: "scoring worker produced no result".to_string(),
                }),
            }
        }

        if !failures.is_empty() {
            return Err(ScoreError::NodeScoringFailed {
                plugin: plugin.name().to_string(),
                task: task.id.clone(),
                failures,
            });
        }
        Ok(scores)
    }
}

/// `scores` must hold exactly one entry per candidate, in candidate order.
fn verify_against_candidates(
    task: &str,
    candidates: &[String],
    scores: &[NodeScore],
) -> Result<(), ScoreError> {
    let malformed = |reason| ScoreError::MalformedScoreList {
        task: task.to_string(),
        reason,
    };

    if scores.len() != candidates.len() {
        return Err(malformed(MalformedReason::LengthMismatch {
            expected: candidates.len(),
            actual: scores.len(),
        }));
    }
    for (index, (expected, entry)) in candidates.iter().zip(scores).enumerate() {
        if *expected != entry.name {
            return Err(malformed(MalformedReason::NodeMismatch {
                index,
                expected: expected.clone(),
                actual: entry.name.clone(),
            }));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

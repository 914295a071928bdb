/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hash-plus-jitter scorer (`sample-plugin`).
//!
//! ```text
//! base  = fold(crc32_ieee(node_name) as i32) % 100
//! score = (base + uniform[0, 100)) % 100          ∈ [0, 100)
//! ```
//!
//! `fold` returns `h` when `h >= 0`, otherwise `-h`; `i32::MIN` has no
//! positive counterpart and maps to a fixed `100`.
//!
//! The checksum is read as a 32-bit signed value.  A host whose native
//! integer is 64 bits wide would never see it negative (`"123456789"` folds to
//! base 62 there, 34 here); the 32-bit reading is the one implemented.
//!
//! # Randomness
//! The jitter comes from a generator owned by the scorer and seeded exactly
//! once, when the scorer is built ([`HashScorer::seeded`],
//! [`HashScorer::from_entropy`] or any generator via
//! [`HashScorer::with_rng`]).  There is no reseeding per call: with a fixed
//! seed and sequential scoring (`parallelism = 1`) the output is fully
//! reproducible.
//!
//! This plugin also implements the pre-filter, filter and pre-bind extension
//! points as logged no-ops that always succeed.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::framework::{
    FilterPlugin, Plugin, PreBindPlugin, PreFilterPlugin, ScoreError, ScorePlugin,
};
use crate::inventory::NodeInfoLister;
use crate::task::{RawScore, Task};

/// Registry name.
pub const NAME: &str = "sample-plugin";

/// Scores are reduced modulo this value.
const SCORE_SPAN: i64 = 100;

/// Used when the folded checksum cannot be negated (`i32::MIN`).
const UNREPRESENTABLE_HASH: i64 = 100;

// ── Hash helpers ──────────────────────────────────────────────────────────────

/// Non-negative hash of a node name: IEEE CRC-32, read as `i32`, then folded.
pub fn node_name_hash(name: &str) -> i64 {
    fold_checksum(crc32fast::hash(name.as_bytes()) as i32)
}

fn fold_checksum(h: i32) -> i64 {
    if h >= 0 {
        return i64::from(h);
    }
    match h.checked_neg() {
        Some(v) => i64::from(v),
        None => UNREPRESENTABLE_HASH,
    }
}

/// `(base + jitter) % 100` for `base`, `jitter` in `[0, 100)`.
fn jittered(base: i64, jitter: i64) -> RawScore {
    (base + jitter) % SCORE_SPAN
}

// ── HashScorer ────────────────────────────────────────────────────────────────

/// Deterministic-hash scorer with bounded random jitter.
pub struct HashScorer<R = StdRng> {
    rng: Mutex<R>,
}

impl HashScorer<StdRng> {
    /// Reproducible scorer.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Scorer seeded once from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng + Send> HashScorer<R> {
    /// Scorer drawing jitter from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn draw_jitter(&self) -> i64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..SCORE_SPAN)
    }
}

/// [`PluginFactory`](crate::framework::PluginFactory) for the registry.
pub fn factory(config: &ScoringConfig, _inventory: Arc<dyn NodeInfoLister>) -> Arc<dyn ScorePlugin> {
    match config.hash_seed {
        Some(seed) => Arc::new(HashScorer::seeded(seed)),
        None => Arc::new(HashScorer::from_entropy()),
    }
}

impl<R: Rng + Send> Plugin for HashScorer<R> {
    fn name(&self) -> &str {
        NAME
    }
}

impl<R: Rng + Send> ScorePlugin for HashScorer<R> {
    fn score(&self, _task: &Task, node: &str) -> Result<RawScore, ScoreError> {
        let base = node_name_hash(node) % SCORE_SPAN;
        let score = jittered(base, self.draw_jitter());
        debug!(node = %node, base, score, "hash score");
        Ok(score)
    }
}

impl<R: Rng + Send> PreFilterPlugin for HashScorer<R> {
    fn pre_filter(&self, task: &Task) -> Result<(), ScoreError> {
        debug!(task = %task.id, "prefilter");
        Ok(())
    }
}

impl<R: Rng + Send> FilterPlugin for HashScorer<R> {
    fn filter(&self, task: &Task, node: &str) -> Result<(), ScoreError> {
        debug!(task = %task.id, node = %node, "filter");
        Ok(())
    }
}

impl<R: Rng + Send> PreBindPlugin for HashScorer<R> {
    fn pre_bind(&self, task: &Task, node: &str) -> Result<(), ScoreError> {
        debug!(task = %task.id, node = %node, "prebind");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Scoring configuration loading.
//!
//! Every field is optional; a missing file section falls back to the
//! defaults below.  The expected YAML structure is:
//! ```yaml
//! parallelism: 16
//! strategies: [sample-plugin, PodState]
//! hash_seed: 42
//! density_label_key: app
//! log_filter: info
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::plugins::{density, hash};

/// Default number of concurrent per-node score calls.
pub const DEFAULT_PARALLELISM: usize = 16;

// ── ScoringConfig ─────────────────────────────────────────────────────────────

/// Settings for the scoring host: which strategies run and how.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Upper bound on concurrent per-node score calls.
    pub parallelism: usize,

    /// Strategy names, in registry order.
    pub strategies: Vec<String>,

    /// Seed for the hash scorer's jitter.  `None` seeds from OS entropy once,
    /// when the scorer is built.
    pub hash_seed: Option<u64>,

    /// Label that identifies "same kind" tasks for the density scorer.
    pub density_label_key: String,

    /// Fallback `tracing` filter directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            strategies: vec![hash::NAME.to_string(), density::NAME.to_string()],
            hash_seed: None,
            density_label_key: density::DEFAULT_LABEL_KEY.to_string(),
            log_filter: String::from("info"),
        }
    }
}

impl ScoringConfig {
    /// Parses `path`, then sanitizes the result.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if the YAML is
    /// structurally invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scoring configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config: ScoringConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        Ok(config.sanitized())
    }

    /// Clamps values that would make the pipeline unusable.
    pub fn sanitized(mut self) -> Self {
        if self.parallelism == 0 {
            warn!("parallelism = 0 is not allowed, using 1");
            self.parallelism = 1;
        }
        if self.strategies.is_empty() {
            warn!("No strategies configured, every task will get an empty report");
        }
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

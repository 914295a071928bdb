/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use nodescore::config::ScoringConfig;
use nodescore::framework::{Registry, ScoringPipeline};
use nodescore::inventory::{InventorySnapshot, NodeInfoLister};
use nodescore::plugins::FACTORIES;
use nodescore::task::Task;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Score one task against a set of candidate nodes.
///
/// Example:
///   nodescore -i inventory.yaml -t default/web-7 -l app=web -n node01 -n node02
#[derive(Debug, Parser)]
#[command(
    name = "nodescore",
    about = "Node scoring and normalization for a cluster scheduler",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML inventory snapshot (node → placed tasks).
    #[arg(short = 'i', long = "inventory")]
    inventory: PathBuf,

    /// Path to the YAML scoring configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Identifier of the task being scored.
    #[arg(short = 't', long = "task", default_value = "default/task")]
    task: String,

    /// Task label as key=value (repeatable).
    #[arg(short = 'l', long = "label", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Candidate node (repeatable).  Defaults to every node in the inventory.
    #[arg(short = 'n', long = "node")]
    nodes: Vec<String>,

    /// Seed for the hash scorer; overrides the configuration file.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,
}

fn parse_label(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("label '{}' is not in key=value form", raw);
    };
    if key.is_empty() {
        bail!("label '{}' has an empty key", raw);
    }
    Ok((key.to_string(), value.to_string()))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match ScoringConfig::load_from_file(path) {
            Ok(c) => c,
            Err(e) => {
                // Logging is not up yet.
                eprintln!("Failed to load scoring configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => ScoringConfig::default(),
    };
    if cli.seed.is_some() {
        config.hash_seed = cli.seed;
    }

    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("nodescore starting up...");
    info!(
        inventory   = %cli.inventory.display(),
        config      = ?cli.config,
        parallelism = config.parallelism,
        strategies  = ?config.strategies,
        hash_seed   = ?config.hash_seed,
        "Configuration"
    );

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli, config: ScoringConfig) -> Result<()> {
    let snapshot = InventorySnapshot::load_from_file(&cli.inventory)?;

    let candidates = if cli.nodes.is_empty() {
        warn!("No candidate nodes given, scoring every node in the inventory");
        snapshot.node_names()
    } else {
        cli.nodes
    };

    let inventory: Arc<dyn NodeInfoLister> = Arc::new(snapshot);
    let registry = Registry::from_config(&config, inventory, FACTORIES)
        .context("Failed to build the strategy registry")?;
    let pipeline = ScoringPipeline::new(registry, config.parallelism);

    let mut task = Task::new(cli.task);
    task.labels.extend(cli.labels);
    let task = Arc::new(task);

    let report = pipeline.run(Arc::clone(&task), &candidates).await?;

    for strategy in &report.strategies {
        match &strategy.outcome {
            Ok(scores) => {
                info!(plugin = %strategy.plugin, "Normalized scores:");
                for s in scores {
                    info!("  [{name}]  score={score}", name = s.name, score = s.score);
                }
            }
            Err(e) => warn!(plugin = %strategy.plugin, "No scores: {}", e),
        }
    }

    if report.successful().next().is_none() && !report.strategies.is_empty() {
        bail!("every strategy failed for task '{}'", report.task);
    }
    Ok(())
}

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! End-to-end scoring runs through the public API.

use std::sync::Arc;

use nodescore::config::ScoringConfig;
use nodescore::framework::{Registry, ScoreError, ScoringPipeline};
use nodescore::inventory::{InventorySnapshot, NodeInfo, NodeInfoLister};
use nodescore::plugins::{density, hash, DensityScorer, HashScorer, FACTORIES};
use nodescore::task::{Task, MAX_NODE_SCORE, MIN_NODE_SCORE};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn web(id: &str) -> Task {
    Task::new(id).with_label("app", "web")
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

/// a: empty, b: two web tasks, c: one db task.
fn three_node_inventory() -> Arc<dyn NodeInfoLister> {
    Arc::new(InventorySnapshot::from_nodes([
        NodeInfo::new("a"),
        NodeInfo::new("b").with_task(web("w1")).with_task(web("w2")),
        NodeInfo::new("c").with_task(Task::new("d1").with_label("app", "db")),
    ]))
}

fn density_only(inventory: Arc<dyn NodeInfoLister>) -> ScoringPipeline {
    let mut registry = Registry::new();
    registry
        .register(Arc::new(DensityScorer::new(inventory)))
        .unwrap();
    ScoringPipeline::new(registry, 4)
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn density_tie_at_top_keeps_order_and_hits_bounds() {
    // raw: a=100, b=98, c=100
    let pipeline = density_only(three_node_inventory());
    let report = pipeline
        .run(Arc::new(web("default/web-new")), &names(&["a", "b", "c"]))
        .await
        .unwrap();

    let scores = report.get(density::NAME).unwrap().outcome.as_ref().unwrap();
    let got: Vec<(&str, i64)> = scores.iter().map(|s| (s.name.as_str(), s.score)).collect();
    assert_eq!(
        got,
        vec![("a", MAX_NODE_SCORE), ("b", MIN_NODE_SCORE), ("c", MAX_NODE_SCORE)]
    );
}

#[tokio::test]
async fn single_candidate_gets_degenerate_value() {
    let pipeline = density_only(three_node_inventory());
    let report = pipeline
        .run(Arc::new(web("default/web-new")), &names(&["b"]))
        .await
        .unwrap();

    let by_node = report.scores_by_node(density::NAME).unwrap();
    assert_eq!(by_node.len(), 1);
    assert_eq!(by_node["b"], MIN_NODE_SCORE);
}

#[tokio::test]
async fn node_removed_between_filter_and_score() {
    let pipeline = density_only(three_node_inventory());
    let report = pipeline
        .run(Arc::new(web("default/web-new")), &names(&["a", "gone", "c"]))
        .await
        .unwrap();

    match &report.get(density::NAME).unwrap().outcome {
        Err(ScoreError::NodeScoringFailed { failures, .. }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].node, "gone");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn both_strategies_stay_in_range() {
    let inventory = three_node_inventory();
    let mut registry = Registry::new();
    registry.register(Arc::new(HashScorer::seeded(11))).unwrap();
    registry
        .register(Arc::new(DensityScorer::new(Arc::clone(&inventory))))
        .unwrap();
    let pipeline = ScoringPipeline::new(registry, 2);
    let candidates = names(&["a", "b", "c"]);

    let report = pipeline
        .run(Arc::new(web("default/web-new")), &candidates)
        .await
        .unwrap();

    assert_eq!(report.task, "default/web-new");
    assert_eq!(report.strategies.len(), 2);
    assert_eq!(report.strategies[0].plugin, hash::NAME);
    assert_eq!(report.strategies[1].plugin, density::NAME);

    for strategy in &report.strategies {
        let scores = strategy.outcome.as_ref().unwrap();
        let order: Vec<&str> = scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(scores
            .iter()
            .all(|s| (MIN_NODE_SCORE..=MAX_NODE_SCORE).contains(&s.score)));
    }
}

#[tokio::test]
async fn seeded_sequential_runs_are_reproducible() {
    let candidates = names(&["a", "b", "c", "d", "e"]);
    let task = Arc::new(Task::new("t"));

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let mut registry = Registry::new();
        registry.register(Arc::new(HashScorer::seeded(3))).unwrap();
        let pipeline = ScoringPipeline::new(registry, 1);
        let report = pipeline.run(Arc::clone(&task), &candidates).await.unwrap();
        outputs.push(report.strategies[0].outcome.clone().unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn registry_from_config_follows_configured_order() {
    let config = ScoringConfig {
        strategies: vec![density::NAME.to_string(), hash::NAME.to_string()],
        hash_seed: Some(1),
        ..Default::default()
    };
    let registry = Registry::from_config(&config, three_node_inventory(), FACTORIES).unwrap();
    assert_eq!(registry.names(), vec![density::NAME, hash::NAME]);

    let pipeline = ScoringPipeline::new(registry, config.parallelism);
    let report = pipeline
        .run(Arc::new(web("default/web-new")), &names(&["c", "a"]))
        .await
        .unwrap();
    // c and a both have zero web tasks: degenerate range.
    let by_node = report.scores_by_node(density::NAME).unwrap();
    assert_eq!(by_node["a"], MIN_NODE_SCORE);
    assert_eq!(by_node["c"], MIN_NODE_SCORE);
}

#[tokio::test]
async fn yaml_inventory_drives_density_scores() {
    let yaml = r#"
nodes:
  node01:
    tasks:
      - id: default/web-1
        labels: { app: web }
      - id: default/web-2
        labels: { app: web }
      - id: default/web-3
        labels: { app: web }
  node02:
    tasks:
      - id: default/web-4
        labels: { app: web }
  node03: {}
"#;
    let snapshot = InventorySnapshot::from_yaml_str(yaml).unwrap();
    let candidates = snapshot.node_names();
    let pipeline = density_only(Arc::new(snapshot));

    let report = pipeline
        .run(Arc::new(web("default/web-new")), &candidates)
        .await
        .unwrap();

    // raw: 97, 99, 100 → (0, 66, 100)
    let by_node = report.scores_by_node(density::NAME).unwrap();
    assert_eq!(by_node["node01"], 0);
    assert_eq!(by_node["node02"], 66);
    assert_eq!(by_node["node03"], 100);
}

#[tokio::test]
async fn concurrent_tasks_share_one_pipeline() {
    let pipeline = Arc::new(density_only(three_node_inventory()));
    let candidates = names(&["a", "b", "c"]);

    let (web_report, db_report) = tokio::join!(
        pipeline.run(Arc::new(web("default/web-new")), &candidates),
        pipeline.run(
            Arc::new(Task::new("default/db-new").with_label("app", "db")),
            &candidates
        ),
    );

    // web raw: a=100, b=98, c=100 ; db raw: a=100, b=100, c=99
    let web_scores = web_report.unwrap();
    let web_by_node = web_scores.scores_by_node(density::NAME).unwrap();
    assert_eq!(web_by_node["b"], MIN_NODE_SCORE);

    let db_scores = db_report.unwrap();
    let db_by_node = db_scores.scores_by_node(density::NAME).unwrap();
    assert_eq!(db_by_node["a"], MAX_NODE_SCORE);
    assert_eq!(db_by_node["b"], MAX_NODE_SCORE);
    assert_eq!(db_by_node["c"], MIN_NODE_SCORE);
}

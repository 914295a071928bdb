/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Node scoring for a cluster workload scheduler.
//!
//! Given a task that passed feasibility filtering and its candidate nodes,
//! each registered strategy produces a raw score per node and rescales the
//! list into the canonical `0..=100` range, ready for weighted aggregation
//! by the scheduler.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task          – Task, NodeScore, score range constants
//! ├── inventory/    – read-only node → tasks snapshot (YAML loadable)
//! ├── config/       – scoring host configuration (YAML)
//! ├── framework/    – plugin contract, errors, normalizer, pipeline
//! └── plugins/      – hash (sample-plugin) and density (PodState) strategies
//! ```

pub mod config;
pub mod framework;
pub mod inventory;
pub mod plugins;
pub mod task;

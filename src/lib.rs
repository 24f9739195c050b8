// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Viewer benchmark harness
//!
//! Runs the 3D viewer in benchmark mode over a directory of models,
//! optionally sweeping the point-light count, and charts the FPS results.

pub mod aggregate;
pub mod args;
pub mod bench;
pub mod chart;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fps_csv;
pub mod report;
pub mod reporter;
pub mod runner;
pub mod source;
pub mod sweep;
pub mod table;

pub use aggregate::{mean, SampleStats};
pub use args::{ArgPair, ViewerArgs};
pub use bench::{BenchOutcome, Benchmark};
pub use chart::{ChartKind, ChartSpec};
pub use config::{BenchConfig, Shading, Strategy};
pub use discovery::{discover_models, ModelFile};
pub use error::BenchError;
pub use report::BenchReport;
pub use runner::Runner;
pub use source::{RunOutput, RunRequest, SampleSource};
pub use sweep::{run_sweep, sweep_enabled, RunConfig, SweepOutcome, SweepPlan};
pub use table::ResultTable;

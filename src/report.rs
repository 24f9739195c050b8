// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Run reports (JSON and Markdown)

use crate::config::Strategy;
use crate::sweep::RunStats;
use crate::table::ResultTable;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub strategy: Strategy,
    pub viewer_args: String,
    pub runs: usize,
    pub table: ResultTable,
    /// Per-run sample statistics (streaming only)
    pub run_stats: Vec<RunStats>,
}

impl BenchReport {
    pub fn new(
        strategy: Strategy,
        viewer_args: String,
        table: ResultTable,
        run_stats: Vec<RunStats>,
    ) -> Self {
        let runs = table.row_count() * table.row_len();
        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            strategy,
            viewer_args,
            runs,
            table,
            run_stats,
        }
    }

    /// Mean FPS over every cell of the table
    pub fn overall_mean(&self) -> f64 {
        let values: Vec<f64> = self
            .table
            .rows
            .iter()
            .flat_map(|r| r.values.iter().copied())
            .collect();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Streaming runs that ended before collecting `expected` samples
    pub fn short_runs(&self, expected: usize) -> impl Iterator<Item = &RunStats> + '_ {
        self.run_stats.iter().filter(move |r| r.stats.count < expected)
    }

    /// Write JSON report
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())
    }

    /// Write Markdown report
    pub fn write_markdown(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_markdown().as_bytes())
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Viewer Benchmark Report ({})\n\n", self.timestamp));

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- **Strategy**: {}\n", self.strategy));
        let args = if self.viewer_args.is_empty() {
            "(none)"
        } else {
            self.viewer_args.as_str()
        };
        md.push_str(&format!("- **Viewer Args**: `{}`\n", args));
        md.push_str(&format!("- **Models**: {}\n", self.table.row_count()));
        md.push_str(&format!("- **Runs**: {}\n", self.runs));
        md.push_str(&format!("- **Mean FPS**: {:.1}\n\n", self.overall_mean()));

        md.push_str("## Results\n\n");
        match &self.table.sweep_values {
            Some(sweep) => {
                md.push_str("| Model |");
                for v in sweep {
                    md.push_str(&format!(" {} |", v));
                }
                md.push_str("\n|-------|");
                md.push_str(&"------|".repeat(sweep.len()));
                md.push('\n');
            }
            None => md.push_str("| Model | FPS |\n|-------|------|\n"),
        }
        for row in &self.table.rows {
            md.push_str(&format!("| {} |", row.model));
            for v in &row.values {
                md.push_str(&format!(" {:.1} |", v));
            }
            md.push('\n');
        }

        if !self.run_stats.is_empty() {
            md.push_str("\n## Samples\n\n");
            for run in &self.run_stats {
                let label = match run.sweep_value {
                    Some(v) => format!("{} @ {}", run.model, v),
                    None => run.model.clone(),
                };
                md.push_str(&format!("- {}: {}\n", label, run.stats.summary()));
            }
        }

        md
    }
}

/// Write via a temp file in the same directory, then rename into place
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

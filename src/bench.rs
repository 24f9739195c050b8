// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Benchmark orchestration: discover, sweep, tabulate, chart

use crate::chart::{self, ChartSpec};
use crate::config::{BenchConfig, Shading, Strategy};
use crate::discovery::{discover_models, ModelFile};
use crate::error::BenchError;
use crate::fps_csv::{CsvLayout, FpsCsv};
use crate::report::BenchReport;
use crate::runner::Runner;
use crate::source::{CsvSource, StreamingSource};
use crate::sweep::{run_sweep, RunConfig, SweepObserver, SweepOutcome, SweepPlan};
use crate::table::ResultTable;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Everything a finished benchmark produced
#[derive(Debug, Clone)]
pub struct BenchOutcome {
    pub models: Vec<ModelFile>,
    pub table: ResultTable,
    pub chart: ChartSpec,
    pub report: BenchReport,
}

/// Output files written after a run
#[derive(Debug, Clone)]
pub struct WrittenOutputs {
    pub chart_png: PathBuf,
    pub chart_json: PathBuf,
    pub report_json: PathBuf,
    pub report_md: PathBuf,
}

/// One benchmarking invocation
pub struct Benchmark {
    config: BenchConfig,
    run_config: RunConfig,
    shading: Shading,
}

impl Benchmark {
    /// `extra_args` are forwarded to the viewer; exactly one turns on the sweep
    pub fn new(config: BenchConfig, extra_args: &[String]) -> Self {
        let plan = SweepPlan::new(config.sweep_flag.clone(), config.sweep_values.clone());
        let run_config = RunConfig::from_invocation(extra_args, plan);
        let shading = Shading::detect(extra_args).unwrap_or(config.shading);
        Self {
            config,
            run_config,
            shading,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run_config
    }

    pub fn runner(&self) -> Runner {
        Runner::new(self.config.viewer_path(), &self.config.working_dir)
    }

    /// Models that will be benchmarked, sorted
    pub fn models(&self) -> Result<Vec<ModelFile>> {
        let dir = self.config.working_dir.join(&self.config.models_dir);
        discover_models(&dir, &self.config.pattern)
    }

    /// Total viewer runs for `model_count` models
    pub fn total_runs(&self, model_count: usize) -> usize {
        model_count * self.run_config.runs_per_model()
    }

    /// Run every model through the viewer and build the chart
    pub fn run<O: SweepObserver + ?Sized>(&self, observer: &mut O) -> Result<BenchOutcome> {
        self.config.validate()?;
        let models = self.models()?;
        self.run_models(models, observer)
    }

    /// Same as [`Benchmark::run`] with an explicit model list
    pub fn run_models<O: SweepObserver + ?Sized>(
        &self,
        models: Vec<ModelFile>,
        observer: &mut O,
    ) -> Result<BenchOutcome> {
        if models.is_empty() {
            return Err(BenchError::NoModels {
                dir: self.config.working_dir.join(&self.config.models_dir),
                pattern: self.config.pattern.clone(),
            }
            .into());
        }

        let runner = self.runner();
        runner.ensure_viewer()?;

        let (table, run_stats) = match self.config.strategy {
            Strategy::Streaming => {
                let mut source = StreamingSource::new(runner, self.config.samples_per_run)
                    .with_warmup(self.config.warmup_samples);
                match run_sweep(&models, &self.run_config, &mut source, observer)? {
                    SweepOutcome::Measured { table, runs } => (table, runs),
                    SweepOutcome::Deferred { .. } => bail!("streaming runs returned no samples"),
                }
            }
            Strategy::Csv => {
                let csv = FpsCsv::new(self.config.csv_file());
                csv.reset()?;
                let layout = CsvLayout::new(self.run_config.csv_row_len(models.len()))?;
                let mut source = CsvSource::new(runner, csv.clone(), layout);

                match run_sweep(&models, &self.run_config, &mut source, observer)? {
                    SweepOutcome::Deferred { .. } => {}
                    SweepOutcome::Measured { .. } => bail!("csv runs returned samples directly"),
                }

                let rows = csv
                    .read_rows()
                    .with_context(|| format!("Malformed FPS file {}", csv.path().display()))?;
                let table = ResultTable::from_csv_rows(&models, self.run_config.sweep_values(), rows)
                    .with_context(|| format!("Malformed FPS file {}", csv.path().display()))?;
                (table, Vec::new())
            }
        };

        let chart = ChartSpec::from_table(&table, self.shading);
        let report = BenchReport::new(
            self.config.strategy,
            self.run_config.base_args.to_string(),
            table.clone(),
            run_stats,
        );

        Ok(BenchOutcome {
            models,
            table,
            chart,
            report,
        })
    }

    /// Write the PNG chart, chart JSON and reports
    pub fn write_outputs(&self, outcome: &BenchOutcome) -> Result<WrittenOutputs> {
        let chart_png = self.config.working_dir.join(&self.config.chart_path);
        let report_dir = self.config.working_dir.join(&self.config.report_dir);
        std::fs::create_dir_all(&report_dir)
            .with_context(|| format!("Failed to create {}", report_dir.display()))?;

        let outputs = WrittenOutputs {
            chart_json: chart_png.with_extension("json"),
            report_json: report_dir.join("latest.json"),
            report_md: report_dir.join("report.md"),
            chart_png,
        };

        chart::render_png(&outcome.chart, &outputs.chart_png)?;
        outcome.chart.write_json(&outputs.chart_json)?;
        outcome.report.write_json(&outputs.report_json)?;
        outcome.report.write_markdown(&outputs.report_md)?;

        Ok(outputs)
    }
}

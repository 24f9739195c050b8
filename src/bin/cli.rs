// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Viewer benchmark CLI

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use viewer_bench::chart;
use viewer_bench::reporter::{ConsoleObserver, Reporter};
use viewer_bench::{BenchConfig, Benchmark, Strategy};

#[derive(Parser)]
#[command(name = "viewer-bench")]
#[command(version)]
#[command(about = "Benchmark the 3D viewer over a directory of PLY models", long_about = None)]
struct Cli {
    /// Config file (defaults to viewer-bench.toml when present)
    #[arg(long, value_name = "FILE")]
    bench_config: Option<PathBuf>,

    /// How FPS values are collected (streaming or csv)
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Directory holding the models
    #[arg(long, value_name = "DIR")]
    models: Option<PathBuf>,

    /// Viewer executable
    #[arg(long, value_name = "EXE")]
    viewer: Option<PathBuf>,

    /// Samples per streaming run
    #[arg(long)]
    samples: Option<usize>,

    /// Leading samples to discard per streaming run
    #[arg(long)]
    warmup: Option<usize>,

    /// PNG chart output
    #[arg(long, value_name = "PNG")]
    chart: Option<PathBuf>,

    /// Directory for JSON and Markdown reports
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Open the chart when done and wait for the viewer to close
    #[arg(long)]
    show: bool,

    /// List the planned runs without launching the viewer
    #[arg(long)]
    dry_run: bool,

    /// Print every run instead of a progress bar
    #[arg(long)]
    verbose: bool,

    /// Arguments forwarded to the viewer; exactly one enables the point-light sweep
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "VIEWER_ARGS")]
    viewer_args: Vec<String>,
}

impl Cli {
    fn config(&self) -> Result<BenchConfig> {
        let mut config = match &self.bench_config {
            Some(path) => BenchConfig::from_file(path)?,
            None => BenchConfig::load()?,
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(ref models) = self.models {
            config.models_dir = models.clone();
        }
        if let Some(ref viewer) = self.viewer {
            config.viewer = viewer.clone();
        }
        if let Some(samples) = self.samples {
            config.samples_per_run = samples;
        }
        if let Some(warmup) = self.warmup {
            config.warmup_samples = warmup;
        }
        if let Some(ref chart) = self.chart {
            config.chart_path = chart.clone();
        }
        if let Some(ref report_dir) = self.report_dir {
            config.report_dir = report_dir.clone();
        }
        config.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            Reporter::report_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    };

    if let Err(e) = bench_command(&cli, config) {
        Reporter::report_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn bench_command(cli: &Cli, config: BenchConfig) -> Result<()> {
    let verbose = config.verbose;
    let bench = Benchmark::new(config, &cli.viewer_args);
    let models = bench.models()?;
    let total = bench.total_runs(models.len());

    match bench.run_config().sweep_values() {
        Some(values) => Reporter::report_info(&format!(
            "{} models × {} point-light values ({:?}) = {} runs",
            models.len(),
            values.len(),
            values,
            total
        )),
        None => Reporter::report_info(&format!("{} models, {} runs", models.len(), total)),
    }

    if cli.dry_run {
        let runner = bench.runner();
        for model in &models {
            for (_, args) in bench.run_config().invocations() {
                let command = runner.command(&args, model)?;
                println!("  {:?}", command);
            }
        }
        return Ok(());
    }

    let runner = bench.runner();
    Reporter::progress(&format!(
        "Running {} ({})",
        runner.viewer().display(),
        bench.config().strategy
    ));

    let mut observer = ConsoleObserver::new(total, verbose);
    let outcome = bench.run_models(models, &mut observer);
    observer.finish();
    let outcome = outcome?;

    let expected = bench.config().samples_per_run;
    for run in outcome.report.short_runs(expected) {
        let label = match run.sweep_value {
            Some(v) => format!("{} @ {} lights", run.model, v),
            None => run.model.clone(),
        };
        Reporter::report_warning(&format!(
            "{}: viewer stopped after {} of {} samples",
            label, run.stats.count, expected
        ));
    }

    let outputs = bench.write_outputs(&outcome)?;

    chart::print_terminal(&outcome.chart);

    Reporter::rule();
    Reporter::success(&format!(
        "Benchmarked {} models, mean {:.1} FPS",
        outcome.table.row_count(),
        outcome.report.overall_mean()
    ));
    println!(
        "  {} {}",
        "Chart:".bright_black(),
        outputs.chart_png.display().to_string().cyan()
    );
    println!(
        "  {} {}",
        "JSON Report:".bright_black(),
        outputs.report_json.display().to_string().cyan()
    );
    println!(
        "  {} {}",
        "Markdown Report:".bright_black(),
        outputs.report_md.display().to_string().cyan()
    );
    Reporter::rule();

    if cli.show {
        chart::show(&outputs.chart_png)?;
    }

    Ok(())
}

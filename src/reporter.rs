// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Console output with colored formatting

use crate::source::RunRequest;
use crate::sweep::SweepObserver;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    pub fn progress(message: &str) {
        println!("{} {}...", "⏳".bright_blue(), message.bright_black());
    }

    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// One finished run
    pub fn report_run(model: &str, sweep_value: Option<u32>, fps: Option<f64>) {
        let label = match sweep_value {
            Some(v) => format!("{} @ {} lights", model, v),
            None => model.to_string(),
        };
        match fps {
            Some(fps) => println!(
                "  {} {:<32} {}",
                "•".bright_black(),
                label,
                format!("{:.1} FPS", fps).cyan()
            ),
            None => println!(
                "  {} {:<32} {}",
                "•".bright_black(),
                label,
                "recorded".bright_black()
            ),
        }
    }

    pub fn rule() {
        println!("{}", "━".repeat(80).bright_black());
    }
}

/// Shows a progress bar, or one line per run when verbose
pub struct ConsoleObserver {
    bar: Option<ProgressBar>,
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new(total_runs: usize, verbose: bool) -> Self {
        let bar = if verbose {
            None
        } else {
            let pb = ProgressBar::new(total_runs as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        };
        Self { bar, verbose }
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_with_message("done");
        }
    }
}

impl SweepObserver for ConsoleObserver {
    fn run_started(&mut self, request: &RunRequest<'_>) {
        if let Some(ref pb) = self.bar {
            pb.set_message(request.model.name.clone());
        }
    }

    fn run_finished(&mut self, request: &RunRequest<'_>, fps: Option<f64>) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
        }
        if self.verbose {
            Reporter::report_run(&request.model.name, request.sweep_value, fps);
        }
    }
}

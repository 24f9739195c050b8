// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Benchmark configuration

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "viewer-bench.toml";

/// Point-light counts swept when sweep mode is on
pub const DEFAULT_SWEEP_VALUES: [u32; 5] = [50, 100, 150, 200, 250];

/// How FPS values get from the viewer to the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Read per-frame samples from the viewer's stdout, then kill it
    Streaming,
    /// Let the viewer append its averaged value to a shared CSV file
    Csv,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Streaming => write!(f, "streaming"),
            Strategy::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "streaming" | "stream" | "stdout" => Ok(Strategy::Streaming),
            "csv" | "file" => Ok(Strategy::Csv),
            other => bail!("unknown strategy {:?} (expected streaming or csv)", other),
        }
    }
}

/// Viewer shading mode, used for the bar chart title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    Simple,
    Forward,
}

impl Shading {
    /// Infer the mode from forwarded viewer flags
    pub fn detect(args: &[String]) -> Option<Self> {
        args.iter().find_map(|arg| match arg.as_str() {
            "--ss" | "--simple" => Some(Shading::Simple),
            "--fs" | "--forward" => Some(Shading::Forward),
            _ => None,
        })
    }
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shading::Simple => write!(f, "simple"),
            Shading::Forward => write!(f, "forward"),
        }
    }
}

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Viewer executable, relative to `working_dir`
    pub viewer: PathBuf,
    /// Directory the viewer runs in
    pub working_dir: PathBuf,
    /// Directory holding the model files
    pub models_dir: PathBuf,
    /// File name pattern for models
    pub pattern: String,
    /// Shared FPS file written by the viewer in csv mode, relative to `working_dir`
    pub csv_path: PathBuf,
    pub strategy: Strategy,
    /// Samples read per streaming run before the viewer is stopped
    pub samples_per_run: usize,
    /// Leading samples discarded in streaming mode
    pub warmup_samples: usize,
    pub sweep_flag: String,
    pub sweep_values: Vec<u32>,
    pub shading: Shading,
    /// PNG chart output
    pub chart_path: PathBuf,
    /// Directory for JSON/Markdown run reports
    pub report_dir: PathBuf,
    pub verbose: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            viewer: PathBuf::from("./build/3DViewer"),
            working_dir: PathBuf::from("."),
            models_dir: PathBuf::from("./data/models/"),
            pattern: "*.ply".to_string(),
            csv_path: PathBuf::from("./out/fps.csv"),
            strategy: Strategy::Csv,
            samples_per_run: 100,
            warmup_samples: 0,
            sweep_flag: "--pl".to_string(),
            sweep_values: DEFAULT_SWEEP_VALUES.to_vec(),
            shading: Shading::Simple,
            chart_path: PathBuf::from("./out/fps.png"),
            report_dir: PathBuf::from("./out"),
            verbose: false,
        }
    }
}

impl BenchConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: BenchConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `viewer-bench.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `VIEWER_BENCH_*` overrides read through `lookup`
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(exe) = lookup("VIEWER_BENCH_EXE") {
            self.viewer = PathBuf::from(exe);
        }

        if let Some(models) = lookup("VIEWER_BENCH_MODELS") {
            self.models_dir = PathBuf::from(models);
        }

        if let Some(strategy) = lookup("VIEWER_BENCH_STRATEGY") {
            self.strategy = strategy.parse()?;
        }

        if let Some(samples) = lookup("VIEWER_BENCH_SAMPLES") {
            self.samples_per_run = samples
                .parse()
                .with_context(|| format!("VIEWER_BENCH_SAMPLES is not a count: {:?}", samples))?;
        }

        Ok(self)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Viewer executable as seen from the harness
    pub fn viewer_path(&self) -> PathBuf {
        self.working_dir.join(&self.viewer)
    }

    /// CSV file as seen from the harness
    pub fn csv_file(&self) -> PathBuf {
        self.working_dir.join(&self.csv_path)
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.strategy == Strategy::Streaming && self.samples_per_run == 0 {
            bail!("samples_per_run must be at least 1 in streaming mode");
        }
        if self.sweep_values.is_empty() {
            bail!("sweep_values must not be empty");
        }
        if self.sweep_flag.trim().is_empty() {
            bail!("sweep_flag must not be empty");
        }
        Ok(())
    }
}

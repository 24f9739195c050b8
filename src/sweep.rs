// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sweep controller: which runs happen, and in what order

use crate::aggregate::{mean, SampleStats};
use crate::args::{ArgPair, ViewerArgs};
use crate::discovery::ModelFile;
use crate::error::BenchError;
use crate::source::{RunOutput, RunRequest, SampleSource};
use crate::table::{ResultTable, TableBuilder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Sweep mode is on only when exactly one extra argument was given,
/// whatever that argument is.
pub fn sweep_enabled(extra_arg_count: usize) -> bool {
    extra_arg_count == 1
}

/// Parameter swept across runs of the same model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub flag: String,
    pub values: Vec<u32>,
}

impl SweepPlan {
    pub fn new(flag: impl Into<String>, values: Vec<u32>) -> Self {
        Self {
            flag: flag.into(),
            values,
        }
    }

    /// Point-light sweep: `--pl 50` .. `--pl 250`
    pub fn point_lights() -> Self {
        Self::new("--pl", crate::config::DEFAULT_SWEEP_VALUES.to_vec())
    }
}

/// Arguments and sweep for one benchmark invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub base_args: ViewerArgs,
    pub sweep: Option<SweepPlan>,
}

impl RunConfig {
    /// Forward `extra_args` verbatim and enable `plan` per [`sweep_enabled`]
    pub fn from_invocation(extra_args: &[String], plan: SweepPlan) -> Self {
        let sweep = sweep_enabled(extra_args.len()).then_some(plan);
        Self {
            base_args: ViewerArgs::forwarded(extra_args.iter().cloned()),
            sweep,
        }
    }

    pub fn sweep_values(&self) -> Option<&[u32]> {
        self.sweep.as_ref().map(|s| s.values.as_slice())
    }

    /// Argument sets for one model, in run order
    pub fn invocations(&self) -> Vec<(Option<u32>, ViewerArgs)> {
        match &self.sweep {
            None => vec![(None, self.base_args.clone())],
            Some(plan) => plan
                .values
                .iter()
                .map(|&v| {
                    let args = self.base_args.with(ArgPair::with_value(plan.flag.clone(), v));
                    (Some(v), args)
                })
                .collect(),
        }
    }

    /// Runs per model
    pub fn runs_per_model(&self) -> usize {
        self.sweep.as_ref().map_or(1, |s| s.values.len())
    }

    /// Values per line of the FPS file: all models on one line without a
    /// sweep, one line per model with a sweep
    pub fn csv_row_len(&self, model_count: usize) -> usize {
        match &self.sweep {
            None => model_count,
            Some(plan) => plan.values.len(),
        }
    }
}

/// Statistics for one finished streaming run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub model: String,
    pub sweep_value: Option<u32>,
    pub stats: SampleStats,
}

/// Result of a complete sweep
#[derive(Debug, Clone)]
pub enum SweepOutcome {
    /// Every run returned samples; the table is complete
    Measured {
        table: ResultTable,
        runs: Vec<RunStats>,
    },
    /// Every run wrote to the FPS file; the table must be read back from it
    Deferred { runs: usize },
}

/// Hooks for progress output
pub trait SweepObserver {
    fn run_started(&mut self, _request: &RunRequest<'_>) {}
    fn run_finished(&mut self, _request: &RunRequest<'_>, _fps: Option<f64>) {}
}

/// Observer that ignores everything
pub struct Silent;

impl SweepObserver for Silent {}

/// Run every model (and every sweep value) strictly one after another
pub fn run_sweep<S, O>(
    models: &[ModelFile],
    config: &RunConfig,
    source: &mut S,
    observer: &mut O,
) -> Result<SweepOutcome>
where
    S: SampleSource + ?Sized,
    O: SweepObserver + ?Sized,
{
    let invocations = config.invocations();
    let mut builder = TableBuilder::new(models, config.sweep_values());
    let mut stats = Vec::new();
    let mut recorded = 0usize;
    let mut run_index = 0usize;

    for model in models {
        for (sweep_value, args) in &invocations {
            let request = RunRequest {
                model,
                args,
                run_index,
                sweep_value: *sweep_value,
            };
            observer.run_started(&request);

            let fps = match source.run(&request)? {
                RunOutput::Samples(samples) => {
                    let fps = mean(&samples).map_err(|_| BenchError::NoSamples {
                        model: model.name.clone(),
                    })?;
                    stats.push(RunStats {
                        model: model.name.clone(),
                        sweep_value: *sweep_value,
                        stats: SampleStats::from_samples(&samples)?,
                    });
                    builder.push(fps)?;
                    Some(fps)
                }
                RunOutput::Recorded => {
                    recorded += 1;
                    None
                }
            };

            observer.run_finished(&request, fps);
            run_index += 1;
        }
    }

    if recorded == 0 {
        let table = builder.finish().context("Sweep produced a malformed table")?;
        Ok(SweepOutcome::Measured { table, runs: stats })
    } else if builder.is_empty() {
        Ok(SweepOutcome::Deferred { runs: recorded })
    } else {
        Err(BenchError::MixedOutputs.into())
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read per-frame FPS from the viewer's stdout until enough samples arrive

use super::{RunOutput, RunRequest, SampleSource};
use crate::error::BenchError;
use crate::runner::Runner;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};

/// The viewer runs until killed, printing one FPS value per line
pub struct StreamingSource {
    runner: Runner,
    samples_per_run: usize,
    warmup_samples: usize,
}

impl StreamingSource {
    pub fn new(runner: Runner, samples_per_run: usize) -> Self {
        Self {
            runner,
            samples_per_run,
            warmup_samples: 0,
        }
    }

    /// Discard this many leading samples from every run
    pub fn with_warmup(mut self, warmup_samples: usize) -> Self {
        self.warmup_samples = warmup_samples;
        self
    }
}

impl SampleSource for StreamingSource {
    fn run(&mut self, request: &RunRequest<'_>) -> Result<RunOutput> {
        let mut guard = self.runner.spawn_streaming(request.args, request.model)?;
        let stdout = guard
            .take_stdout()
            .context("viewer stdout was not captured")?;

        let samples = read_samples(stdout, self.warmup_samples, self.samples_per_run)
            .with_context(|| format!("Failed to read FPS from viewer for {}", request.model.name))?;
        guard.terminate();

        if samples.is_empty() {
            return Err(BenchError::NoSamples {
                model: request.model.name.clone(),
            }
            .into());
        }

        Ok(RunOutput::Samples(samples))
    }
}

/// Collect up to `limit` samples after skipping `warmup`.
///
/// Stops early when the stream ends. Blank lines are ignored; any other line
/// that is not a number is an error.
pub fn read_samples<R: Read>(reader: R, warmup: usize, limit: usize) -> Result<Vec<f64>> {
    let mut samples = Vec::with_capacity(limit);
    let mut seen = 0usize;

    if limit == 0 {
        return Ok(samples);
    }

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.context("Failed to read viewer output")?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }

        let fps: f64 = value.parse().map_err(|_| BenchError::BadSample {
            line: idx + 1,
            value: value.to_string(),
        })?;

        seen += 1;
        if seen > warmup {
            samples.push(fps);
            if samples.len() >= limit {
                break;
            }
        }
    }

    Ok(samples)
}

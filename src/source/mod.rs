// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sample sources: one viewer run per call

pub mod csv;
pub mod streaming;

pub use self::csv::CsvSource;
pub use streaming::StreamingSource;

use crate::args::ViewerArgs;
use crate::discovery::ModelFile;
use anyhow::Result;

/// Everything a source needs for one run
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub model: &'a ModelFile,
    pub args: &'a ViewerArgs,
    /// 0-based position of this run across the whole benchmark
    pub run_index: usize,
    pub sweep_value: Option<u32>,
}

/// What a run hands back
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutput {
    /// Raw per-frame FPS samples, to be averaged by the caller
    Samples(Vec<f64>),
    /// The viewer wrote its own averaged value to the FPS file
    Recorded,
}

/// Runs the viewer once per call
pub trait SampleSource {
    fn run(&mut self, request: &RunRequest<'_>) -> Result<RunOutput>;
}

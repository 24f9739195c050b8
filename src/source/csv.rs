// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Let the viewer append its own averaged FPS to the shared file

use super::{RunOutput, RunRequest, SampleSource};
use crate::fps_csv::{CsvLayout, FpsCsv};
use crate::runner::Runner;
use anyhow::Result;

/// Writes the separator for each run, then runs the viewer to completion
pub struct CsvSource {
    runner: Runner,
    csv: FpsCsv,
    layout: CsvLayout,
}

impl CsvSource {
    pub fn new(runner: Runner, csv: FpsCsv, layout: CsvLayout) -> Self {
        Self {
            runner,
            csv,
            layout,
        }
    }
}

impl SampleSource for CsvSource {
    fn run(&mut self, request: &RunRequest<'_>) -> Result<RunOutput> {
        self.csv.write_separator(self.layout, request.run_index)?;
        self.runner.run_to_completion(request.args, request.model)?;
        Ok(RunOutput::Recorded)
    }
}

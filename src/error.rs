// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for benchmark runs

use std::path::PathBuf;
use thiserror::Error;

/// Failures the benchmark loop reports to its caller
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("viewer executable not found: {}", .0.display())]
    ViewerNotFound(PathBuf),

    #[error("failed to launch viewer for {model}: {source}")]
    Launch {
        model: String,
        #[source]
        source: std::io::Error,
    },

    #[error("viewer exited with {status} while benchmarking {model}")]
    ViewerFailed { model: String, status: String },

    #[error("no FPS samples were produced for {model}")]
    NoSamples { model: String },

    #[error("cannot average an empty sample set")]
    EmptySamples,

    #[error("unparsable FPS value {value:?} on line {line}")]
    BadSample { line: usize, value: String },

    #[error("jagged FPS table: row {row} has {found} values, expected {expected}")]
    JaggedTable {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("FPS table has {found} rows, expected {expected} ({context})")]
    TableShape {
        found: usize,
        expected: usize,
        context: String,
    },

    #[error("no model files matching {pattern} in {}", .dir.display())]
    NoModels { dir: PathBuf, pattern: String },

    #[error("sample source returned both direct and recorded results")]
    MixedOutputs,
}

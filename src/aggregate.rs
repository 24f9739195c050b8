// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! FPS sample aggregation

use crate::error::BenchError;
use serde::{Deserialize, Serialize};

/// Arithmetic mean of the samples. An empty slice is an error, never NaN.
pub fn mean(samples: &[f64]) -> Result<f64, BenchError> {
    if samples.is_empty() {
        return Err(BenchError::EmptySamples);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Summary statistics for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl SampleStats {
    /// Compute statistics over the samples
    pub fn from_samples(samples: &[f64]) -> Result<Self, BenchError> {
        let mean = mean(samples)?;
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let variance =
            samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        Ok(Self {
            count: samples.len(),
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }

    /// Format as `mean ± std (min..max)`
    pub fn summary(&self) -> String {
        format!(
            "{:.1} ± {:.1} FPS ({:.1}..{:.1}, n={})",
            self.mean, self.std_dev, self.min, self.max, self.count
        )
    }
}

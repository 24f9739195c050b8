// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Chart selection and rendering
//!
//! A table with one value per model becomes a bar chart; anything else
//! becomes one line series per model over the sweep values.

pub mod raster;
pub mod terminal;

pub use raster::{render_png, CHART_HEIGHT, CHART_WIDTH};
pub use terminal::print_terminal;

use crate::config::Shading;
use crate::table::ResultTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// One line of a line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartKind {
    Bar {
        categories: Vec<String>,
        values: Vec<f64>,
    },
    Line {
        x: Vec<u32>,
        series: Vec<Series>,
    },
}

/// Everything needed to draw the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn from_table(table: &ResultTable, shading: Shading) -> Self {
        if table.is_single_value() {
            return Self {
                title: format!("FPS {}", shading),
                x_label: "model".to_string(),
                y_label: "FPS".to_string(),
                kind: ChartKind::Bar {
                    categories: table.rows.iter().map(|r| r.model.clone()).collect(),
                    values: table.rows.iter().map(|r| r.values[0]).collect(),
                },
            };
        }

        let x = match &table.sweep_values {
            Some(values) => values.clone(),
            None => (1..=table.row_len() as u32).collect(),
        };

        Self {
            title: format!("FPS {} by point lights", shading),
            x_label: "point lights".to_string(),
            y_label: "FPS".to_string(),
            kind: ChartKind::Line {
                x,
                series: table
                    .rows
                    .iter()
                    .map(|r| Series {
                        label: r.model.clone(),
                        values: r.values.clone(),
                    })
                    .collect(),
            },
        }
    }

    pub fn is_bar(&self) -> bool {
        matches!(self.kind, ChartKind::Bar { .. })
    }

    /// Labels shown in the legend (line charts only)
    pub fn legend(&self) -> Vec<&str> {
        match &self.kind {
            ChartKind::Bar { .. } => Vec::new(),
            ChartKind::Line { series, .. } => series.iter().map(|s| s.label.as_str()).collect(),
        }
    }

    /// Largest value on the chart
    pub fn max_value(&self) -> f64 {
        let values: Box<dyn Iterator<Item = &f64>> = match &self.kind {
            ChartKind::Bar { values, .. } => Box::new(values.iter()),
            ChartKind::Line { series, .. } => Box::new(series.iter().flat_map(|s| s.values.iter())),
        };
        values.copied().fold(0.0, f64::max)
    }

    /// Write the chart description as JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write chart JSON to {}", path.display()))?;
        Ok(())
    }
}

/// Open the rendered chart and wait until the viewer application exits
pub fn show(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg("-W");
        c
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "/WAIT", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    command
        .arg(path)
        .status()
        .with_context(|| format!("Failed to open chart {}", path.display()))?;
    Ok(())
}

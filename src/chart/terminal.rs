// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Text preview of a chart for the console

use super::{ChartKind, ChartSpec};
use colored::Colorize;

const BAR_COLUMNS: usize = 40;

/// Lines of the preview, without colour
pub fn preview_lines(spec: &ChartSpec) -> Vec<String> {
    let mut lines = vec![spec.title.clone()];

    match &spec.kind {
        ChartKind::Bar { categories, values } => {
            let width = categories.iter().map(String::len).max().unwrap_or(0);
            let max = spec.max_value();
            for (name, value) in categories.iter().zip(values) {
                let filled = if max > 0.0 {
                    ((value / max) * BAR_COLUMNS as f64).round() as usize
                } else {
                    0
                };
                lines.push(format!(
                    "{:<width$} │{} {:.1}",
                    name,
                    "█".repeat(filled),
                    value,
                    width = width
                ));
            }
        }
        ChartKind::Line { x, series } => {
            let width = series
                .iter()
                .map(|s| s.label.len())
                .max()
                .unwrap_or(0)
                .max(spec.x_label.len());
            let header: Vec<String> = x.iter().map(|v| format!("{:>8}", v)).collect();
            lines.push(format!("{:<width$} │{}", spec.x_label, header.join(""), width = width));
            for s in series {
                let cells: Vec<String> = s.values.iter().map(|v| format!("{:>8.1}", v)).collect();
                lines.push(format!("{:<width$} │{}", s.label, cells.join(""), width = width));
            }
        }
    }

    lines
}

/// Print the preview with the title highlighted
pub fn print_terminal(spec: &ChartSpec) {
    let lines = preview_lines(spec);
    if let Some((title, body)) = lines.split_first() {
        println!("\n{}", title.bold());
        for line in body {
            println!("  {}", line.cyan());
        }
    }
}

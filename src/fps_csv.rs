// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared FPS file written jointly by the harness and the viewer
//!
//! The viewer appends one bare numeric token per run. The harness owns all
//! punctuation: before each run it appends the separator that belongs in
//! front of that run's value.

use crate::error::BenchError;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const FIELD_SEPARATOR: &str = ", ";
pub const RECORD_SEPARATOR: &str = "\n";

/// Row geometry of the FPS file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvLayout {
    row_len: usize,
}

impl CsvLayout {
    /// `row_len` values per line; zero is rejected
    pub fn new(row_len: usize) -> Result<Self, BenchError> {
        if row_len == 0 {
            return Err(BenchError::TableShape {
                found: 0,
                expected: 1,
                context: "values per FPS file line".to_string(),
            });
        }
        Ok(Self { row_len })
    }

    pub fn row_len(&self) -> usize {
        self.row_len
    }

    /// Separator to write before the value of run `run_index` (0-based)
    pub fn separator_before(&self, run_index: usize) -> Option<&'static str> {
        if run_index == 0 {
            None
        } else if run_index % self.row_len == 0 {
            Some(RECORD_SEPARATOR)
        } else {
            Some(FIELD_SEPARATOR)
        }
    }
}

/// Handle on the FPS file
#[derive(Debug, Clone)]
pub struct FpsCsv {
    path: PathBuf,
}

impl FpsCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and truncate the file
    pub fn reset(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        fs::write(&self.path, "")
            .with_context(|| format!("Failed to truncate {}", self.path.display()))?;
        Ok(())
    }

    /// Append raw text; the file is closed again before returning
    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Append the separator that precedes run `run_index`
    pub fn write_separator(&self, layout: CsvLayout, run_index: usize) -> Result<()> {
        match layout.separator_before(run_index) {
            Some(sep) => self.append(sep),
            None => Ok(()),
        }
    }

    /// Parse the whole file into rows
    pub fn read_rows(&self) -> Result<Vec<Vec<f64>>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(parse_rows(&text)?)
    }
}

/// Parse newline-separated rows of comma-separated floats.
///
/// Blank lines are skipped, so a trailing newline never yields an empty row.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<f64>>, BenchError> {
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                field.parse::<f64>().map_err(|_| BenchError::BadSample {
                    line: idx + 1,
                    value: field.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_separators_single_row() {
        // no sweep: every file lands in one row
        let layout = CsvLayout::new(3).unwrap();
        let seps: Vec<_> = (0..3).map(|i| layout.separator_before(i)).collect();
        assert_eq!(seps, vec![None, Some(", "), Some(", ")]);
    }

    #[test]
    fn test_separators_across_rows() {
        let layout = CsvLayout::new(5).unwrap();
        assert_eq!(layout.separator_before(0), None);
        assert_eq!(layout.separator_before(4), Some(", "));
        assert_eq!(layout.separator_before(5), Some("\n"));
        assert_eq!(layout.separator_before(6), Some(", "));
        assert_eq!(layout.separator_before(10), Some("\n"));
    }

    #[test]
    fn test_zero_width_layout_is_error() {
        assert!(matches!(
            CsvLayout::new(0),
            Err(BenchError::TableShape { found: 0, .. })
        ));
    }

    #[test]
    fn test_single_column_layout() {
        let layout = CsvLayout::new(1).unwrap();
        assert_eq!(layout.separator_before(0), None);
        assert_eq!(layout.separator_before(1), Some("\n"));
        assert_eq!(layout.separator_before(2), Some("\n"));
    }

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows("60.5, 30\n12, 13.25\n").unwrap();
        assert_eq!(rows, vec![vec![60.5, 30.0], vec![12.0, 13.25]]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_rows("1.0, 2.0\n3.0, fast\n").unwrap_err();
        assert!(matches!(err, BenchError::BadSample { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_empty_field() {
        assert!(parse_rows("1.0, , 2.0").is_err());
    }

    #[test]
    fn test_reset_creates_and_truncates() {
        let dir = TempDir::new().unwrap();
        let csv = FpsCsv::new(dir.path().join("out").join("fps.csv"));

        csv.reset().unwrap();
        csv.append("42").unwrap();
        csv.reset().unwrap();

        assert_eq!(fs::read_to_string(csv.path()).unwrap(), "");
    }

    #[test]
    fn test_round_trip_grid() {
        let dir = TempDir::new().unwrap();
        let csv = FpsCsv::new(dir.path().join("fps.csv"));
        csv.reset().unwrap();

        let (files, sweeps) = (3, 5);
        let layout = CsvLayout::new(sweeps).unwrap();
        for run in 0..files * sweeps {
            csv.write_separator(layout, run).unwrap();
            // what the viewer would append
            csv.append(&format!("{}", run as f64 + 0.5)).unwrap();
        }

        let rows = csv.read_rows().unwrap();
        assert_eq!(rows.len(), files);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), sweeps);
            assert_eq!(row[0], (r * sweeps) as f64 + 0.5);
        }
    }
}

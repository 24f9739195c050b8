// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-model FPS results

use crate::discovery::ModelFile;
use crate::error::BenchError;
use serde::{Deserialize, Serialize};

/// FPS values for one model, in sweep order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub model: String,
    pub values: Vec<f64>,
}

/// Rectangular table: one row per model, one column per sweep value (or one
/// column without a sweep)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column keys when sweeping
    pub sweep_values: Option<Vec<u32>>,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Values per row
    pub fn row_len(&self) -> usize {
        self.sweep_values.as_ref().map_or(1, Vec::len)
    }

    /// True when every model carries exactly one value
    pub fn is_single_value(&self) -> bool {
        self.rows.iter().all(|r| r.values.len() == 1)
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.model.as_str()).collect()
    }

    /// Build from the parsed FPS file.
    ///
    /// Without a sweep the file is a single line holding one value per model.
    /// With a sweep it holds one line per model with one value per sweep step.
    pub fn from_csv_rows(
        models: &[ModelFile],
        sweep_values: Option<&[u32]>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, BenchError> {
        match sweep_values {
            None => {
                if rows.len() != 1 {
                    return Err(BenchError::TableShape {
                        found: rows.len(),
                        expected: 1,
                        context: "single run per model".to_string(),
                    });
                }
                let row = &rows[0];
                check_row_len(0, row.len(), models.len())?;

                let mut builder = TableBuilder::new(models, None);
                for value in row {
                    builder.push(*value)?;
                }
                builder.finish()
            }
            Some(sweep) => {
                if rows.len() != models.len() {
                    return Err(BenchError::TableShape {
                        found: rows.len(),
                        expected: models.len(),
                        context: "one row per model".to_string(),
                    });
                }
                for (idx, row) in rows.iter().enumerate() {
                    check_row_len(idx, row.len(), sweep.len())?;
                }

                let mut builder = TableBuilder::new(models, Some(sweep));
                for value in rows.into_iter().flatten() {
                    builder.push(value)?;
                }
                builder.finish()
            }
        }
    }
}

fn check_row_len(row: usize, found: usize, expected: usize) -> Result<(), BenchError> {
    if found != expected {
        return Err(BenchError::JaggedTable {
            row,
            found,
            expected,
        });
    }
    Ok(())
}

/// Folds values into a table in file-major order
#[derive(Debug)]
pub struct TableBuilder {
    names: Vec<String>,
    sweep_values: Option<Vec<u32>>,
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new(models: &[ModelFile], sweep_values: Option<&[u32]>) -> Self {
        Self {
            names: models.iter().map(|m| m.name.clone()).collect(),
            sweep_values: sweep_values.map(<[u32]>::to_vec),
            rows: Vec::with_capacity(models.len()),
        }
    }

    fn row_len(&self) -> usize {
        self.sweep_values.as_ref().map_or(1, Vec::len)
    }

    /// Number of values folded so far
    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the next value; starts a new row once the current one is full
    pub fn push(&mut self, value: f64) -> Result<(), BenchError> {
        let row_len = self.row_len();
        let needs_row = self.rows.last().map_or(true, |r| r.values.len() == row_len);

        if needs_row {
            let idx = self.rows.len();
            let Some(name) = self.names.get(idx) else {
                return Err(BenchError::TableShape {
                    found: idx + 1,
                    expected: self.names.len(),
                    context: "more results than models".to_string(),
                });
            };
            self.rows.push(TableRow {
                model: name.clone(),
                values: Vec::with_capacity(row_len),
            });
        }

        if let Some(row) = self.rows.last_mut() {
            row.values.push(value);
        }
        Ok(())
    }

    /// Validate the shape and hand back the table
    pub fn finish(self) -> Result<ResultTable, BenchError> {
        let row_len = self.row_len();

        if self.rows.len() != self.names.len() {
            return Err(BenchError::TableShape {
                found: self.rows.len(),
                expected: self.names.len(),
                context: "one row per model".to_string(),
            });
        }
        for (idx, row) in self.rows.iter().enumerate() {
            check_row_len(idx, row.values.len(), row_len)?;
        }

        Ok(ResultTable {
            sweep_values: self.sweep_values,
            rows: self.rows,
        })
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model file discovery

use crate::error::BenchError;
use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One input asset handed to the viewer with `-i`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFile {
    pub path: PathBuf,
    /// File stem, used as the chart label
    pub name: String,
}

impl ModelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Find every file directly under `dir` whose name matches `pattern`.
///
/// `pattern` is a shell glob matched against the file name (`*.ply`,
/// `bunny_?.ply`, `[ab]*.ply`). Results are sorted by path so runs are
/// reproducible.
pub fn discover_models(dir: &Path, pattern: &str) -> Result<Vec<ModelFile>> {
    let matcher = Pattern::new(pattern)
        .with_context(|| format!("Invalid model pattern {:?}", pattern))?;

    if !dir.is_dir() {
        return Err(BenchError::NoModels {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        }
        .into());
    }

    let mut models: Vec<ModelFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| matcher.matches(&e.file_name().to_string_lossy()))
        .map(|e| ModelFile::new(e.into_path()))
        .collect();

    if models.is_empty() {
        return Err(BenchError::NoModels {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        }
        .into());
    }

    models.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(models)
}

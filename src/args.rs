// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structured viewer arguments
//!
//! Arguments are kept as an ordered list of flag/value pairs and only turned
//! into an argv at the process boundary, so a sweep value can be layered on
//! top of the base arguments without touching them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One command-line argument: a flag with an optional value, or a bare word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgPair {
    pub key: String,
    pub value: Option<String>,
}

impl ArgPair {
    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: Some(value.to_string()),
        }
    }
}

/// Ordered argument list forwarded to the viewer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerArgs {
    pairs: Vec<ArgPair>,
}

impl ViewerArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap freeform arguments verbatim, one pair per argument
    pub fn forwarded<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pairs: args.into_iter().map(ArgPair::flag).collect(),
        }
    }

    pub fn push(&mut self, pair: ArgPair) {
        self.pairs.push(pair);
    }

    /// Copy of these arguments with one extra pair appended
    pub fn with(&self, pair: ArgPair) -> Self {
        let mut next = self.clone();
        next.push(pair);
        next
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[ArgPair] {
        &self.pairs
    }

    /// Flatten into argv form
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.pairs.len() * 2);
        for pair in &self.pairs {
            argv.push(pair.key.clone());
            if let Some(ref value) = pair.value {
                argv.push(value.clone());
            }
        }
        argv
    }
}

impl fmt::Display for ViewerArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_argv().join(" "))
    }
}

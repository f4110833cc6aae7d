// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid scale strings such as `"5ft"` or `"1.5 m"`

use serde::Deserialize;

use crate::error::{Result, RulerError};

/// How many display units one grid cell is worth
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct GridScale {
    pub multiplier: f64,
    pub unit: String,
}

impl GridScale {
    pub fn new(multiplier: f64, unit: impl Into<String>) -> Self {
        Self {
            multiplier,
            unit: unit.into(),
        }
    }

    /// Parse a scale string: a leading number followed by a unit suffix.
    ///
    /// A missing number means a multiplier of 1 (`"sq"` reads as `1sq`).
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(raw.len());
        let (number, unit) = raw.split_at(split);

        let multiplier = if number.is_empty() {
            1.0
        } else {
            number
                .parse::<f64>()
                .map_err(|e| RulerError::InvalidConfig(format!("scale {raw:?}: {e}")))?
        };
        if !multiplier.is_finite() {
            return Err(RulerError::InvalidConfig(format!(
                "scale {raw:?}: multiplier must be finite"
            )));
        }

        Ok(Self {
            multiplier,
            unit: unit.trim().to_string(),
        })
    }
}

impl TryFrom<String> for GridScale {
    type Error = RulerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid configuration, loadable from TOML

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{GridKind, GridScale, Measurement, SnapMode};
use crate::error::RulerError;
use crate::settings;

/// Scene grid settings as the host stores them
///
/// ```toml
/// kind = "square"
/// cell-size = 150.0
/// measurement = "chebyshev"
/// scale = "5ft"
/// precision = 0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GridConfig {
    pub kind: GridKind,
    pub cell_size: f64,
    pub measurement: Measurement,
    pub scale: GridScale,
    pub precision: u8,
    /// Force a snap mode instead of picking one per ruler
    pub snap: Option<SnapMode>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            kind: GridKind::default(),
            cell_size: settings::grid::CELL_SIZE,
            measurement: Measurement::default(),
            scale: GridScale::new(settings::grid::MULTIPLIER, settings::grid::UNIT),
            precision: settings::grid::PRECISION,
            snap: None,
        }
    }
}

impl GridConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, RulerError> {
        toml::from_str(source).map_err(|e| RulerError::InvalidConfig(e.to_string()))
    }

    /// Load a TOML grid config from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid config {}", path.display()))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("Failed to parse grid config {}", path.display()))?;
        tracing::info!(
            "Loaded grid config from {}: {:?} grid, cell size {}",
            path.display(),
            config.kind,
            config.cell_size
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GridConfig::from_toml_str("").unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = GridConfig::from_toml_str(
            r#"
            kind = "hex-horizontal"
            cell-size = 70.0
            measurement = "alternating"
            scale = "1.5m"
            precision = 1
            snap = "corner"
            "#,
        )
        .unwrap();
        assert_eq!(config.kind, GridKind::HexHorizontal);
        assert_eq!(config.cell_size, 70.0);
        assert_eq!(config.measurement, Measurement::Alternating);
        assert_eq!(config.scale, GridScale::new(1.5, "m"));
        assert_eq!(config.precision, 1);
        assert_eq!(config.snap, Some(SnapMode::Corner));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = GridConfig::from_toml_str("dpi = 10").unwrap_err();
        assert!(matches!(err, RulerError::InvalidConfig(_)));
    }

    #[test]
    fn bad_scale_is_rejected() {
        assert!(GridConfig::from_toml_str(r#"scale = "1..2ft""#).is_err());
    }
}

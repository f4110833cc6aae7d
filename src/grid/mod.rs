// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid policy: snapping raw pointer positions and measuring in cells.
//!
//! `GridPolicy` is the seam between the ruler and whatever owns the scene's
//! grid settings. `Grid` is the built-in implementation, configured from a
//! `GridConfig`. Square grids support corner and centre snapping and four
//! measurement rules; hex grids always snap to hex centres and measure in
//! hex steps.

mod config;
mod ready;
mod scale;

pub use config::GridConfig;
pub use ready::{GridHandle, GridPublisher, grid_source};
pub use scale::GridScale;

use std::sync::Arc;

use kurbo::{Point, Vec2};
use serde::Deserialize;

use crate::error::{Result, RulerError};
use crate::settings;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Where snapped points land within a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapMode {
    /// Cell corners (grid line intersections)
    Corner,
    /// Cell centres
    Center,
}

/// Grid cell shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridKind {
    #[default]
    Square,
    /// Flat-topped hexes stacked in vertical columns
    HexVertical,
    /// Pointy-topped hexes laid out in horizontal rows
    HexHorizontal,
}

/// How distances are counted on a square grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Measurement {
    /// Diagonals cost the same as straight steps
    #[default]
    Chebyshev,
    /// Every second diagonal costs two cells (5-10-5)
    Alternating,
    /// Straight-line distance
    Euclidean,
    /// Horizontal plus vertical steps
    Manhattan,
}

/// The operations the ruler needs from the scene's grid
pub trait GridPolicy: std::fmt::Debug {
    /// Surface units per cell
    fn cell_size(&self) -> f64;

    /// Pick the snap mode for a ruler starting at `raw`.
    fn resolve_snap_mode(&self, raw: Point) -> SnapMode;

    /// Align `raw` to the grid. Snapping a snapped point returns it unchanged.
    fn snap(&self, raw: Point, mode: SnapMode) -> Point;

    /// Distance between two points in cells. Symmetric; zero for `a == a`.
    fn measure(&self, a: Point, b: Point) -> f64;

    /// Render a distance in cells as label text, e.g. `"10ft"`.
    fn format(&self, distance: f64) -> String;
}

/// Grid policy shared between the tool and every ruler it starts
pub type SharedGrid = Arc<dyn GridPolicy + Send + Sync>;

/// Built-in grid policy
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    kind: GridKind,
    cell_size: f64,
    measurement: Measurement,
    scale: GridScale,
    precision: u8,
    forced_snap: Option<SnapMode>,
}

impl Grid {
    /// A square grid with Chebyshev measurement and no forced snap mode
    pub fn square(cell_size: f64, scale: GridScale, precision: u8) -> Result<Self> {
        Self::from_config(&GridConfig {
            cell_size,
            scale,
            precision,
            ..GridConfig::default()
        })
    }

    /// Validate a config and build the grid from it
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        if !(config.cell_size.is_finite() && config.cell_size > 0.0) {
            return Err(RulerError::InvalidConfig(format!(
                "cell size must be positive, got {}",
                config.cell_size
            )));
        }
        if config.precision > settings::grid::MAX_PRECISION {
            return Err(RulerError::InvalidConfig(format!(
                "precision {} exceeds {}",
                config.precision,
                settings::grid::MAX_PRECISION
            )));
        }
        Ok(Self {
            kind: config.kind,
            cell_size: config.cell_size,
            measurement: config.measurement,
            scale: config.scale.clone(),
            precision: config.precision,
            forced_snap: config.snap,
        })
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn scale(&self) -> &GridScale {
        &self.scale
    }

    /// Wrap in an `Arc` for sharing with the tool
    pub fn shared(self) -> SharedGrid {
        Arc::new(self)
    }

    fn snap_square(&self, raw: Point, mode: SnapMode) -> Point {
        let cell = self.cell_size;
        match mode {
            SnapMode::Corner => Point::new(
                (raw.x / cell).round() * cell,
                (raw.y / cell).round() * cell,
            ),
            SnapMode::Center => {
                let half = cell / 2.0;
                Point::new(
                    ((raw.x + half) / cell).round() * cell - half,
                    ((raw.y + half) / cell).round() * cell - half,
                )
            }
        }
    }

    /// Circumradius of a hex whose neighbours are `cell_size` apart
    fn hex_radius(&self) -> f64 {
        self.cell_size / SQRT_3
    }

    /// Fractional axial coordinates (q, r) of a surface point
    fn to_axial(&self, p: Point) -> (f64, f64) {
        let s = self.hex_radius();
        match self.kind {
            GridKind::HexHorizontal => {
                let q = (SQRT_3 / 3.0 * p.x - p.y / 3.0) / s;
                let r = (2.0 / 3.0 * p.y) / s;
                (q, r)
            }
            _ => {
                let q = (2.0 / 3.0 * p.x) / s;
                let r = (-p.x / 3.0 + SQRT_3 / 3.0 * p.y) / s;
                (q, r)
            }
        }
    }

    fn from_axial(&self, q: f64, r: f64) -> Point {
        let s = self.hex_radius();
        match self.kind {
            GridKind::HexHorizontal => {
                Point::new(s * (SQRT_3 * q + SQRT_3 / 2.0 * r), s * (1.5 * r))
            }
            _ => Point::new(s * (1.5 * q), s * (SQRT_3 / 2.0 * q + SQRT_3 * r)),
        }
    }

    fn nearest_hex(&self, p: Point) -> (f64, f64) {
        let (q, r) = self.to_axial(p);
        cube_round(q, r)
    }

    fn hex_steps(&self, a: Point, b: Point) -> f64 {
        let (aq, ar) = self.nearest_hex(a);
        let (bq, br) = self.nearest_hex(b);
        let dq = aq - bq;
        let dr = ar - br;
        (dq.abs() + dr.abs() + (dq + dr).abs()) / 2.0
    }

    fn square_cells(&self, delta: Vec2) -> f64 {
        let dx = delta.x.abs() / self.cell_size;
        let dy = delta.y.abs() / self.cell_size;
        match self.measurement {
            Measurement::Chebyshev => dx.max(dy),
            Measurement::Manhattan => dx + dy,
            Measurement::Euclidean => dx.hypot(dy),
            Measurement::Alternating => {
                let diagonal = dx.min(dy);
                let straight = dx.max(dy) - diagonal;
                straight + diagonal + (diagonal / 2.0).floor()
            }
        }
    }
}

impl GridPolicy for Grid {
    fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn resolve_snap_mode(&self, raw: Point) -> SnapMode {
        if let Some(mode) = self.forced_snap {
            return mode;
        }
        if self.kind != GridKind::Square {
            return SnapMode::Center;
        }
        let corner = self.snap_square(raw, SnapMode::Corner);
        let center = self.snap_square(raw, SnapMode::Center);
        if raw.distance(corner) < raw.distance(center) {
            SnapMode::Corner
        } else {
            SnapMode::Center
        }
    }

    fn snap(&self, raw: Point, mode: SnapMode) -> Point {
        match self.kind {
            GridKind::Square => self.snap_square(raw, mode),
            // Hex corners are not a lattice the ruler can walk; always centre.
            GridKind::HexVertical | GridKind::HexHorizontal => {
                let (q, r) = self.nearest_hex(raw);
                self.from_axial(q, r)
            }
        }
    }

    fn measure(&self, a: Point, b: Point) -> f64 {
        if a == b {
            return 0.0;
        }
        match self.kind {
            GridKind::Square => self.square_cells(b - a),
            GridKind::HexVertical | GridKind::HexHorizontal => self.hex_steps(a, b),
        }
    }

    fn format(&self, distance: f64) -> String {
        let value = distance * self.scale.multiplier;
        // Avoid printing "-0" for tiny negative rounding noise.
        let value = if value == 0.0 { 0.0 } else { value };
        format!(
            "{:.*}{}",
            usize::from(self.precision),
            value,
            self.scale.unit
        )
    }
}

/// Round fractional axial coordinates to the containing hex
fn cube_round(q: f64, r: f64) -> (f64, f64) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq, rr)
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Ruler geometry derived from a waypoint list.
//!
//! Everything here is a pure function of the committed waypoints plus an
//! optional live cursor point. Nothing is cached or accumulated between
//! calls: every redraw rebuilds the path, markers, label position and
//! distance from scratch, so a grid change or a rounding rule is reflected
//! consistently on the next frame.

use kurbo::{BezPath, Circle, Point};

use crate::error::{Result, RulerError};
use crate::grid::GridPolicy;
use crate::settings;

/// Everything the ruler draws for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RulerGeometry {
    /// Move-to the first waypoint, line-to each following point
    pub path: BezPath,
    /// One circle per committed waypoint
    pub markers: Vec<Circle>,
    /// Midpoint of the last rendered segment
    pub label_position: Point,
    /// Total length in cells
    pub distance: f64,
    /// `distance` formatted by the grid
    pub label: String,
}

/// Build the full geometry for `waypoints`, extended to `live` if present
pub fn build(
    waypoints: &[Point],
    live: Option<Point>,
    grid: &dyn GridPolicy,
) -> Result<RulerGeometry> {
    let label_position = label_position(waypoints, live)?;
    let distance = total_distance(waypoints, live, grid);
    Ok(RulerGeometry {
        path: path(waypoints, live),
        markers: markers(waypoints),
        label_position,
        distance,
        label: grid.format(distance),
    })
}

/// The polyline through every waypoint, then to the live point
///
/// A single waypoint with no live point yields a lone move-to.
pub fn path(waypoints: &[Point], live: Option<Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, point) in waypoints.iter().copied().chain(live).enumerate() {
        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
    }
    path
}

/// Fixed-radius circles on the committed waypoints (never the live point)
pub fn markers(waypoints: &[Point]) -> Vec<Circle> {
    waypoints
        .iter()
        .map(|&p| Circle::new(p, settings::ruler::MARKER_RADIUS))
        .collect()
}

/// Where the distance label sits.
///
/// The midpoint of the last rendered segment: (last waypoint, live) when
/// previewing, else the last two waypoints. With a single point and no
/// segment the label sits on that point.
pub fn label_position(waypoints: &[Point], live: Option<Point>) -> Result<Point> {
    match (waypoints, live) {
        ([.., last], Some(live)) => Ok(last.midpoint(live)),
        ([], Some(live)) => Ok(live),
        ([.., prev, last], None) => Ok(prev.midpoint(*last)),
        ([only], None) => Ok(*only),
        ([], None) => Err(RulerError::DegenerateGeometry),
    }
}

/// Sum of segment lengths in cells, including the live segment
pub fn total_distance(waypoints: &[Point], live: Option<Point>, grid: &dyn GridPolicy) -> f64 {
    let committed: f64 = waypoints
        .windows(2)
        .map(|pair| grid.measure(pair[0], pair[1]))
        .sum();
    let trailing = match (waypoints.last(), live) {
        (Some(&last), Some(live)) => grid.measure(last, live),
        _ => 0.0,
    };
    committed + trailing
}

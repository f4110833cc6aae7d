// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Ruler settings and configuration constants.
//!
//! This module holds non-visual settings that stay stable across theme
//! changes. Visual styling (colors, stroke widths) belongs in `theme.rs`.

// ============================================================================
// TOOL SETTINGS
// ============================================================================
/// Identifier the host registers the tool mode under
const TOOL_ID: &str = "bendy-ruler";

/// Keyboard shortcut that activates the tool
const TOOL_SHORTCUT: char = 'B';

// ============================================================================
// GRID DEFAULTS
// ============================================================================
// Used when a grid config leaves a field out. These match what a fresh
// scene ships with: 150 units per cell, each cell worth 5ft.

/// Default cell size (surface units per cell)
const GRID_DEFAULT_CELL_SIZE: f64 = 150.0;

/// Default display units per cell
const GRID_DEFAULT_MULTIPLIER: f64 = 5.0;

/// Default unit suffix
const GRID_DEFAULT_UNIT: &str = "ft";

/// Default number of decimals shown on the label
const GRID_DEFAULT_PRECISION: u8 = 0;

/// Largest precision a config may ask for
const GRID_MAX_PRECISION: u8 = 6;

// ============================================================================
// RULER SETTINGS
// ============================================================================
/// Marker diameter (surface units)
const RULER_MARKER_DIAMETER: f64 = 50.0;

/// Label font size
const RULER_LABEL_FONT_SIZE: f64 = 60.0;

/// Rulers shorter than this (in cells) are discarded on finalize
const RULER_MIN_COMMIT_DISTANCE: f64 = 1e-9;

// ============================================================================
// AFFORDANCE SETTINGS
// ============================================================================
// Keep sits up-left of the last waypoint, cancel up-right.

/// Horizontal distance from the last waypoint to each button
const AFFORDANCE_OFFSET_X: f64 = 45.0;

/// Vertical distance from the last waypoint to both buttons
const AFFORDANCE_OFFSET_Y: f64 = -40.0;

/// Text shown on the keep button
const AFFORDANCE_KEEP_TEXT: &str = "✅";

/// Text shown on the cancel button
const AFFORDANCE_CANCEL_TEXT: &str = "🗑️";

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Tool registration settings
pub mod tool {
    /// Tool mode identifier
    pub const ID: &str = super::TOOL_ID;

    /// Activation shortcut
    pub const SHORTCUT: char = super::TOOL_SHORTCUT;
}

/// Defaults applied to partially specified grid configs
pub mod grid {
    pub const CELL_SIZE: f64 = super::GRID_DEFAULT_CELL_SIZE;
    pub const MULTIPLIER: f64 = super::GRID_DEFAULT_MULTIPLIER;
    pub const UNIT: &str = super::GRID_DEFAULT_UNIT;
    pub const PRECISION: u8 = super::GRID_DEFAULT_PRECISION;
    pub const MAX_PRECISION: u8 = super::GRID_MAX_PRECISION;
}

/// Ruler geometry settings
pub mod ruler {
    /// Marker circle radius
    pub const MARKER_RADIUS: f64 = super::RULER_MARKER_DIAMETER / 2.0;

    /// Label font size
    pub const LABEL_FONT_SIZE: f64 = super::RULER_LABEL_FONT_SIZE;

    /// Minimum total distance (cells) for a ruler to be kept.
    ///
    /// Anything below this is treated as an accidental single click.
    pub const MIN_COMMIT_DISTANCE: f64 = super::RULER_MIN_COMMIT_DISTANCE;
}

/// Confirm/cancel button placement
pub mod affordance {
    pub const OFFSET_X: f64 = super::AFFORDANCE_OFFSET_X;
    pub const OFFSET_Y: f64 = super::AFFORDANCE_OFFSET_Y;
    pub const KEEP_TEXT: &str = super::AFFORDANCE_KEEP_TEXT;
    pub const CANCEL_TEXT: &str = super::AFFORDANCE_CANCEL_TEXT;
}

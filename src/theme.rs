// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Theme colors and stroke styling for ruler visuals
//!
//! All colors use hexadecimal format: Color::from_rgb8(0xRR, 0xGG, 0xBB)

use peniko::Color;

// ============================================================================
// BASE COLORS
// ============================================================================
const GREY: Color = Color::from_rgb8(0x80, 0x80, 0x80);
const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);

// ============================================================================
// RULER PATH
// ============================================================================
const RULER_LINE: Color = GREY;
const RULER_LINE_WIDTH: f64 = 10.0;
const RULER_LINE_DASH: [f64; 2] = [50.0, 25.0];

// ============================================================================
// WAYPOINT MARKERS
// ============================================================================
const RULER_MARKER_FILL: Color = GREY;

// ============================================================================
// LABELS
// ============================================================================
const RULER_LABEL_TEXT: Color = WHITE;
const AFFORDANCE_BACKGROUND: Color = Color::from_rgba8(0x22, 0x26, 0x27, 0xee);
const AFFORDANCE_TEXT: Color = WHITE;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// The dashed line connecting waypoints
pub mod path {
    use super::Color;

    pub const STROKE: Color = super::RULER_LINE;
    /// Width of the measuring line
    pub const WIDTH: f64 = super::RULER_LINE_WIDTH;
    /// Dash pattern [dash_length, gap_length]
    pub const DASH: [f64; 2] = super::RULER_LINE_DASH;
}

/// Circles drawn on committed waypoints
pub mod marker {
    use super::Color;

    pub const FILL: Color = super::RULER_MARKER_FILL;
}

/// Distance label and confirm/cancel buttons
pub mod label {
    use super::Color;

    pub const TEXT: Color = super::RULER_LABEL_TEXT;
    pub const BUTTON_BACKGROUND: Color = super::AFFORDANCE_BACKGROUND;
    pub const BUTTON_TEXT: Color = super::AFFORDANCE_TEXT;
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Bendy ruler: a multi-waypoint measuring tool for grid-based scenes.
//!
//! A ruler is a polyline of grid-snapped waypoints. While it is being drawn
//! its path, markers and distance label are broadcast to every viewer
//! through an ephemeral [`transaction::Transaction`]; when kept, the final
//! geometry is handed to a [`scene::SceneStore`]. The [`tools::RulerTool`]
//! maps host input (clicks, moves, keys) onto ruler operations.

pub mod broadcast;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod model;
pub mod ruler;
pub mod scene;
pub mod settings;
pub mod theme;
pub mod tools;
pub mod transaction;

pub use error::{ChannelError, Result, RulerError};
pub use ruler::{FinalizeOutcome, Ruler, RulerState};
pub use tools::{RulerTool, ToolEvent};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Logs go to stderr. `RUST_LOG` overrides the default `bendy_ruler=info`.
/// Calling this more than once is harmless.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bendy_ruler=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Grid readiness.
//!
//! The host loads grid settings asynchronously. Nothing may start a ruler
//! until a grid has been published, so the tool waits on `GridHandle::ready`
//! once per ruler instead of polling. Later publishes (the scene's grid was
//! edited) only affect rulers started afterwards.

use tokio::sync::watch;

use super::SharedGrid;
use crate::error::{Result, RulerError};

/// Create a linked publisher/handle pair with no grid published yet
pub fn grid_source() -> (GridPublisher, GridHandle) {
    let (tx, rx) = watch::channel(None);
    (GridPublisher { tx }, GridHandle { rx })
}

/// Owner side: publishes the current grid
#[derive(Debug)]
pub struct GridPublisher {
    tx: watch::Sender<Option<SharedGrid>>,
}

impl GridPublisher {
    /// Make `grid` the current grid, waking anyone waiting on readiness
    pub fn publish(&self, grid: SharedGrid) {
        self.tx.send_replace(Some(grid));
        tracing::debug!("Grid published");
    }
}

/// Consumer side: waits for and reads the current grid
#[derive(Debug, Clone)]
pub struct GridHandle {
    rx: watch::Receiver<Option<SharedGrid>>,
}

impl GridHandle {
    /// A handle that is ready immediately with a fixed grid
    pub fn fixed(grid: SharedGrid) -> Self {
        let (_tx, rx) = watch::channel(Some(grid));
        Self { rx }
    }

    /// The current grid, if one has been published
    pub fn current(&self) -> Option<SharedGrid> {
        (*self.rx.borrow()).clone()
    }

    /// Wait until a grid has been published and return it
    pub async fn ready(&mut self) -> Result<SharedGrid> {
        let grid = self
            .rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| RulerError::precondition("grid source closed before a grid was published"))?;
        (*grid)
            .clone()
            .ok_or_else(|| RulerError::precondition("grid missing after readiness"))
    }
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Optional listeners for ruler lifecycle events (usage tracking and the like)

use std::sync::Mutex;

use kurbo::Point;

/// Something that happened to a ruler
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// A ruler opened at `start`
    Started { start: Point },
    /// A ruler was committed to the scene
    Kept { distance: f64, label: String },
    /// A ruler was cancelled or was too short to keep
    Discarded,
}

/// Receiver of lifecycle events. Must not block.
pub trait LifecycleObserver: Send + Sync {
    fn notify(&self, event: &LifecycleEvent);
}

/// Logs lifecycle events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LifecycleObserver for TracingObserver {
    fn notify(&self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::Started { start } => {
                tracing::info!("ruler started at ({}, {})", start.x, start.y)
            }
            LifecycleEvent::Kept { label, .. } => tracing::info!("ruler kept: {}", label),
            LifecycleEvent::Discarded => tracing::info!("ruler discarded"),
        }
    }
}

/// Keeps every event it sees
#[derive(Debug, Default)]
pub struct LifecycleLog {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl LifecycleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl LifecycleObserver for LifecycleLog {
    fn notify(&self, event: &LifecycleEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

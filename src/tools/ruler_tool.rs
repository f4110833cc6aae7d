// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The bendy ruler tool.
//!
//! Turns host input into ruler operations. The first click starts a ruler
//! and shows keep/cancel buttons above it; further clicks add waypoints and
//! move the buttons along; pointer moves preview the next segment. Keep,
//! double-click and Enter commit the ruler. Cancel, Escape and deactivating
//! the tool throw it away.
//!
//! The snap mode is decided on the first click of a drawing session and
//! reused for every later point, so one ruler never mixes corners and
//! centres.

use std::sync::Arc;

use kurbo::Point;

use super::affordance::{Affordance, AffordanceItems};
use super::observer::{LifecycleEvent, LifecycleObserver};
use super::{Key, ToolEvent, ToolId};
use crate::broadcast::BroadcastChannel;
use crate::error::{Result, RulerError};
use crate::grid::{GridHandle, SharedGrid, SnapMode};
use crate::model::ItemId;
use crate::ruler::{FinalizeOutcome, Ruler};
use crate::scene::SceneStore;
use crate::transaction::Transaction;

/// Whether a ruler is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    Idle,
    Drawing,
}

/// One drawing session: a ruler plus its buttons
#[derive(Debug)]
struct Drawing<C: BroadcastChannel> {
    /// Grid snapshot taken when the session started
    grid: SharedGrid,
    snap_mode: SnapMode,
    ruler: Ruler<C>,
    buttons: Transaction<AffordanceItems, C>,
}

/// Tool controller for the bendy ruler
pub struct RulerTool<C: BroadcastChannel, S: SceneStore> {
    channel: Arc<C>,
    scene: Arc<S>,
    grid: GridHandle,
    observers: Vec<Arc<dyn LifecycleObserver>>,
    drawing: Option<Drawing<C>>,
}

impl<C: BroadcastChannel, S: SceneStore> RulerTool<C, S> {
    pub fn new(channel: Arc<C>, scene: Arc<S>, grid: GridHandle) -> Self {
        Self {
            channel,
            scene,
            grid,
            observers: Vec::new(),
            drawing: None,
        }
    }

    /// Register a lifecycle observer
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn id(&self) -> ToolId {
        ToolId::BendyRuler
    }

    pub fn state(&self) -> ToolState {
        if self.drawing.is_some() {
            ToolState::Drawing
        } else {
            ToolState::Idle
        }
    }

    /// The ruler being drawn, if any
    pub fn ruler(&self) -> Option<&Ruler<C>> {
        self.drawing.as_ref().map(|d| &d.ruler)
    }

    /// Snap mode of the current session
    pub fn snap_mode(&self) -> Option<SnapMode> {
        self.drawing.as_ref().map(|d| d.snap_mode)
    }

    /// Current keep and cancel buttons
    pub fn affordances(&self) -> Option<&AffordanceItems> {
        self.drawing.as_ref().map(|d| d.buttons.items())
    }

    /// Ids of the keep and cancel buttons, in that order
    pub fn affordance_ids(&self) -> Option<(ItemId, ItemId)> {
        self.affordances()
            .map(|buttons| (buttons.keep.id, buttons.cancel.id))
    }

    // ===== Event Dispatch =====

    /// Route any input event to its handler
    pub async fn handle(&mut self, event: ToolEvent) -> Result<()> {
        match event {
            ToolEvent::Click { position, target } => self.on_click(position, target).await,
            ToolEvent::Move { position } => self.on_move(position),
            ToolEvent::DoubleClick { position } => self.on_double_click(position),
            ToolEvent::KeyDown { key } => self.on_key_down(&key),
            ToolEvent::Deactivate => {
                self.on_deactivate();
                Ok(())
            }
        }
    }

    pub async fn on_click(&mut self, position: Point, target: Option<ItemId>) -> Result<()> {
        if self.drawing.is_none() {
            return self.start(position).await;
        }

        let hit = target.and_then(|id| self.affordances().and_then(|buttons| buttons.hit(id)));
        match hit {
            Some(Affordance::Keep) => self.keep(),
            Some(Affordance::Cancel) => {
                self.discard();
                Ok(())
            }
            None => self.extend(position).await,
        }
    }

    /// Preview the next segment. Moves while idle (including right after a
    /// ruler was kept or cancelled) are ignored; only the ruler itself
    /// rejects previews once it is finished.
    pub fn on_move(&mut self, position: Point) -> Result<()> {
        let Some(drawing) = self.drawing.as_mut() else {
            return Ok(());
        };
        let point = drawing.grid.snap(position, drawing.snap_mode);
        drawing.ruler.preview_to(Some(point))
    }

    /// Double-click commits; the position is not added as a waypoint
    pub fn on_double_click(&mut self, _position: Point) -> Result<()> {
        self.keep()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Result<()> {
        match key {
            Key::Enter => self.keep(),
            Key::Escape => {
                self.discard();
                Ok(())
            }
            Key::Other(_) => Ok(()),
        }
    }

    /// Switching tools always discards, never commits
    pub fn on_deactivate(&mut self) {
        self.discard();
    }

    // ===== Transitions =====

    async fn start(&mut self, position: Point) -> Result<()> {
        let grid = self.grid.ready().await?;
        let snap_mode = grid.resolve_snap_mode(position);
        let point = grid.snap(position, snap_mode);

        let mut ruler = match Ruler::create(point, Arc::clone(&grid), Arc::clone(&self.channel)).await
        {
            Ok(ruler) => ruler,
            Err(e) => {
                tracing::warn!("Bendy ruler could not start: {}", e);
                return Err(e);
            }
        };

        let buttons =
            match Transaction::open(Arc::clone(&self.channel), 0, AffordanceItems::new(point)).await {
                Ok(buttons) => buttons,
                Err(e) => {
                    tracing::warn!("Bendy ruler buttons could not open: {}", e);
                    ruler.cancel();
                    return Err(e);
                }
            };

        tracing::debug!("Bendy ruler drawing with {:?} snapping", snap_mode);
        self.drawing = Some(Drawing {
            grid,
            snap_mode,
            ruler,
            buttons,
        });
        self.emit(&LifecycleEvent::Started { start: point });
        Ok(())
    }

    async fn extend(&mut self, position: Point) -> Result<()> {
        let drawing = self
            .drawing
            .as_mut()
            .ok_or_else(|| RulerError::precondition("extend without a ruler"))?;
        let point = drawing.grid.snap(position, drawing.snap_mode);
        drawing.ruler.add_point(point).await?;
        drawing.buttons.mutate(|buttons| buttons.move_to(point))
    }

    /// Commit the ruler and return to idle
    fn keep(&mut self) -> Result<()> {
        let Some(mut drawing) = self.drawing.take() else {
            return Ok(());
        };
        let outcome = drawing.ruler.finalize(&*self.scene);
        drawing.buttons.close();
        match outcome {
            Ok(FinalizeOutcome::Kept { distance, label }) => {
                self.emit(&LifecycleEvent::Kept { distance, label });
                Ok(())
            }
            Ok(FinalizeOutcome::Discarded) => {
                self.emit(&LifecycleEvent::Discarded);
                Ok(())
            }
            Err(e) => {
                drawing.ruler.cancel();
                self.emit(&LifecycleEvent::Discarded);
                Err(e)
            }
        }
    }

    /// Throw the ruler away and return to idle
    fn discard(&mut self) {
        let Some(mut drawing) = self.drawing.take() else {
            return;
        };
        drawing.ruler.cancel();
        drawing.buttons.close();
        self.emit(&LifecycleEvent::Discarded);
    }

    fn emit(&self, event: &LifecycleEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }
}

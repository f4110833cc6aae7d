// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The bendy ruler: a growing list of waypoints and the visuals derived
//! from it.
//!
//! A `Ruler` owns its waypoints and exactly one live [`Transaction`] holding
//! the path, label and one marker per waypoint. Pointer moves mutate that
//! transaction in place. Adding a waypoint changes the set of objects (one
//! more marker), so it opens a new transaction with the full set and only
//! then closes the old one.
//!
//! Re-opening is split into three steps so the caller can keep handling
//! input while the broadcast handshake is in flight:
//!
//! 1. [`Ruler::stage_point`] appends the waypoint and bumps the generation,
//!    returning a [`Reopen`].
//! 2. [`Reopen::open`] awaits the channel.
//! 3. [`Ruler::install`] adopts the result if it is still the newest
//!    staged generation and the ruler is still active; otherwise the late
//!    transaction is closed on the spot.
//!
//! A stage whose open fails is undone with [`Ruler::rollback`], which makes
//! the next-newest stage (if any) the one `install` waits for.
//!
//! [`Ruler::add_point`] and [`Ruler::create`] run all three in sequence.

use std::sync::Arc;

use kurbo::Point;

use crate::broadcast::BroadcastChannel;
use crate::error::{Result, RulerError};
use crate::geometry::{self, RulerGeometry};
use crate::grid::SharedGrid;
use crate::model::{Item, MarkerItem, PathItem, TextItem};
use crate::scene::SceneStore;
use crate::settings;
use crate::transaction::{ItemSet, Transaction, hand_over};

// ===== Item Set =====

/// The ruler's visuals, by role
#[derive(Debug, Clone, PartialEq)]
pub struct RulerItems {
    pub path: PathItem,
    pub label: TextItem,
    pub markers: Vec<MarkerItem>,
}

impl RulerItems {
    /// Copy freshly built geometry into the items.
    ///
    /// Markers are matched up by position; a transaction opened before the
    /// newest waypoint keeps its shorter marker list.
    fn apply(&mut self, geometry: &RulerGeometry) {
        self.path.commands = geometry.path.clone();
        self.label.position = geometry.label_position;
        self.label.text.clone_from(&geometry.label);
        for (marker, circle) in self.markers.iter_mut().zip(&geometry.markers) {
            marker.circle = *circle;
        }
    }
}

impl ItemSet for RulerItems {
    fn to_items(&self) -> Vec<Item> {
        let mut items = Vec::with_capacity(self.markers.len() + 2);
        items.push(Item::Path(self.path.clone()));
        items.push(Item::Text(self.label.clone()));
        items.extend(self.markers.iter().cloned().map(Item::Marker));
        items
    }
}

// ===== State =====

/// Lifecycle of a ruler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulerState {
    /// Constructed, first broadcast not yet open
    Pending,
    /// Broadcasting; accepts points and previews
    Active,
    /// Handed to the scene store
    Finalized,
    /// Discarded without persisting
    Cancelled,
}

impl RulerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RulerState::Finalized | RulerState::Cancelled)
    }
}

/// Result of installing an opened transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installed {
    /// The transaction is now the ruler's live broadcast
    Live,
    /// A newer generation or a terminal state won; the transaction was closed
    Stale,
}

/// What `finalize` did
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeOutcome {
    /// Items were handed to the scene store
    Kept { distance: f64, label: String },
    /// Too short to keep; nothing persisted
    Discarded,
}

/// A staged re-open, ready to negotiate with the channel
#[derive(Debug)]
#[must_use = "a staged reopen does nothing until opened and installed"]
pub struct Reopen<C: BroadcastChannel> {
    channel: Arc<C>,
    generation: u64,
    items: RulerItems,
}

impl<C: BroadcastChannel> Reopen<C> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Open the broadcast for the staged item set
    pub async fn open(self) -> Result<Transaction<RulerItems, C>> {
        Transaction::open(self.channel, self.generation, self.items).await
    }
}

// ===== Ruler =====

/// A generation handed out by `stage_*` and not yet installed or rolled back
#[derive(Debug, Clone, Copy)]
struct Staged {
    generation: u64,
    adds_point: bool,
}

/// A multi-waypoint measuring line
#[derive(Debug)]
pub struct Ruler<C: BroadcastChannel> {
    grid: SharedGrid,
    channel: Arc<C>,
    waypoints: Vec<Point>,
    live: Option<Point>,
    path: PathItem,
    label: TextItem,
    markers: Vec<MarkerItem>,
    transaction: Option<Transaction<RulerItems, C>>,
    generation: u64,
    staged: Vec<Staged>,
    state: RulerState,
}

impl<C: BroadcastChannel> Ruler<C> {
    /// Construct a ruler at `start` without opening its broadcast yet
    pub fn new(start: Point, grid: SharedGrid, channel: Arc<C>) -> Self {
        let path = PathItem::new();
        let label = TextItem::new(path.id);
        let markers = vec![MarkerItem::new(start, path.id)];
        Self {
            grid,
            channel,
            waypoints: vec![start],
            live: None,
            path,
            label,
            markers,
            transaction: None,
            generation: 0,
            staged: Vec::new(),
            state: RulerState::Pending,
        }
    }

    /// Construct a ruler at `start` and open its first broadcast
    pub async fn create(start: Point, grid: SharedGrid, channel: Arc<C>) -> Result<Self> {
        let mut ruler = Self::new(start, grid, channel);
        let reopen = ruler.stage_open()?;
        let transaction = reopen.open().await?;
        ruler.install(transaction)?;
        tracing::debug!("Ruler started at ({}, {})", start.x, start.y);
        Ok(ruler)
    }

    // ----- Accessors -----

    pub fn state(&self) -> RulerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RulerState::Active
    }

    /// Committed waypoints in order
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn last_waypoint(&self) -> Option<Point> {
        self.waypoints.last().copied()
    }

    /// The point currently being previewed, if any
    pub fn live_point(&self) -> Option<Point> {
        self.live
    }

    /// Newest generation handed out by `stage_*`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation of the transaction currently broadcasting
    pub fn transaction_generation(&self) -> Option<u64> {
        self.transaction.as_ref().map(Transaction::generation)
    }

    /// Items as last pushed to the live transaction
    pub fn items(&self) -> Option<&RulerItems> {
        self.transaction.as_ref().map(Transaction::items)
    }

    /// Current total length in cells, including the preview segment
    pub fn distance(&self) -> f64 {
        geometry::total_distance(&self.waypoints, self.live, &*self.grid)
    }

    /// Current label text
    pub fn label_text(&self) -> String {
        self.grid.format(self.distance())
    }

    // ----- Re-open protocol -----

    /// Stage a broadcast of the current waypoints under a new generation
    pub fn stage_open(&mut self) -> Result<Reopen<C>> {
        self.stage(false)
    }

    /// Append a waypoint and stage the enlarged item set
    pub fn stage_point(&mut self, point: Point) -> Result<Reopen<C>> {
        self.ensure_active("add a point")?;
        self.waypoints.push(point);
        self.markers.push(MarkerItem::new(point, self.path.id));
        self.live = None;
        tracing::debug!(
            "Ruler waypoint {} at ({}, {})",
            self.waypoints.len(),
            point.x,
            point.y
        );
        self.stage(true)
    }

    /// Adopt an opened transaction if it is still wanted
    pub fn install(&mut self, transaction: Transaction<RulerItems, C>) -> Result<Installed> {
        let wanted = self.staged.last().map(|staged| staged.generation);
        if self.state.is_terminal() || wanted != Some(transaction.generation()) {
            tracing::debug!(
                "Discarding stale transaction generation {} (waiting for {:?}, {:?})",
                transaction.generation(),
                wanted,
                self.state
            );
            drop(transaction);
            return Ok(Installed::Stale);
        }

        hand_over(&mut self.transaction, transaction);
        self.staged.clear();
        self.state = RulerState::Active;
        self.live = None;
        self.push()?;
        Ok(Installed::Live)
    }

    /// Undo a stage whose broadcast failed to open.
    ///
    /// Only the newest stage can be rolled back; an older stage is covered
    /// by the newer one, which carries the same waypoints and more. After a
    /// rollback `install` waits for the next-newest stage, whose item set
    /// matches the remaining waypoints.
    pub fn rollback(&mut self, generation: u64) {
        if self.state.is_terminal()
            || self.staged.last().map(|staged| staged.generation) != Some(generation)
        {
            return;
        }
        let Some(staged) = self.staged.pop() else {
            return;
        };
        if staged.adds_point && self.waypoints.len() > 1 {
            self.waypoints.pop();
            self.markers.pop();
        }
        tracing::debug!("Rolled back generation {}", generation);
        if self.transaction.is_some()
            && let Err(e) = self.push()
        {
            tracing::warn!("Ruler redraw after rollback failed: {}", e);
        }
    }

    // ----- Operations -----

    /// Append a waypoint and move the broadcast over to the larger item set
    pub async fn add_point(&mut self, point: Point) -> Result<()> {
        let reopen = self.stage_point(point)?;
        let generation = reopen.generation();
        match reopen.open().await {
            Ok(transaction) => {
                self.install(transaction)?;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Ruler could not reopen for new waypoint: {}", e);
                self.rollback(generation);
                Err(e)
            }
        }
    }

    /// Redraw with the path extended to `point` (or without a preview)
    pub fn preview_to(&mut self, point: Option<Point>) -> Result<()> {
        self.ensure_active("preview")?;
        self.live = point;
        tracing::trace!("Ruler preview to {:?}", point);
        self.push()
    }

    /// Drop the preview and hand the result to `store`.
    ///
    /// A ruler shorter than `settings::ruler::MIN_COMMIT_DISTANCE` is
    /// cancelled instead.
    pub fn finalize(&mut self, store: &dyn SceneStore) -> Result<FinalizeOutcome> {
        self.preview_to(None)?;

        let distance = self.distance();
        if distance < settings::ruler::MIN_COMMIT_DISTANCE {
            tracing::debug!("Ruler too short to keep ({} cells), cancelling", distance);
            self.cancel();
            return Ok(FinalizeOutcome::Discarded);
        }

        // Persist from the ruler's own state: the live transaction may still
        // predate a waypoint whose reopen is in flight.
        let items = self.current_items()?;
        let Some(mut transaction) = self.transaction.take() else {
            return Err(RulerError::precondition("active ruler without a transaction"));
        };
        let label = items.label.text.clone();
        store.add_permanent_objects(items.to_items());
        transaction.close();
        self.state = RulerState::Finalized;
        self.staged.clear();
        self.generation += 1;
        tracing::debug!("Ruler kept: {} ({} waypoints)", label, self.waypoints.len());
        Ok(FinalizeOutcome::Kept { distance, label })
    }

    /// Remove every visual and discard the ruler. Safe to repeat.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        if let Some(mut transaction) = self.transaction.take() {
            transaction.close();
        }
        self.state = RulerState::Cancelled;
        self.staged.clear();
        self.generation += 1;
        self.waypoints.clear();
        self.markers.clear();
        self.live = None;
        tracing::debug!("Ruler cancelled");
    }

    // ----- Internals -----

    fn ensure_active(&self, action: &str) -> Result<()> {
        match self.state {
            RulerState::Active => Ok(()),
            state => Err(RulerError::precondition(format!(
                "cannot {action} on a {state:?} ruler"
            ))),
        }
    }

    fn geometry(&self) -> Result<RulerGeometry> {
        geometry::build(&self.waypoints, self.live, &*self.grid)
    }

    /// Full item set for the current waypoints, one marker each
    fn current_items(&self) -> Result<RulerItems> {
        let geometry = self.geometry()?;
        let mut items = RulerItems {
            path: self.path.clone(),
            label: self.label.clone(),
            markers: self.markers.clone(),
        };
        items.apply(&geometry);
        Ok(items)
    }

    fn stage(&mut self, adds_point: bool) -> Result<Reopen<C>> {
        if self.state.is_terminal() {
            return Err(RulerError::precondition(format!(
                "cannot open a {:?} ruler",
                self.state
            )));
        }
        let items = self.current_items()?;
        self.generation += 1;
        self.staged.push(Staged {
            generation: self.generation,
            adds_point,
        });
        Ok(Reopen {
            channel: Arc::clone(&self.channel),
            generation: self.generation,
            items,
        })
    }

    /// Recompute geometry and publish it through the live transaction
    fn push(&mut self) -> Result<()> {
        let geometry = self.geometry()?;
        let transaction = self
            .transaction
            .as_mut()
            .ok_or_else(|| RulerError::precondition("ruler has no open transaction"))?;
        transaction.mutate(|items| items.apply(&geometry))
    }
}

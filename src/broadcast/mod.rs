// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Ephemeral broadcast of in-progress items to other viewers.
//!
//! A broadcast is a set of items that everyone looking at the surface can
//! see but that is not part of the persisted scene. `BroadcastChannel` is
//! the host's side of that: opening negotiates with the host (and may
//! suspend), publishing replaces the whole item set, and closing removes it.
//! `LocalBroadcast` is an in-process implementation with observers, used by
//! the replay binary and the tests.

mod local;

pub use local::{LocalBroadcast, Observer};

use std::fmt;
use std::future::Future;

use crate::error::ChannelError;
use crate::model::Item;

/// Handle to one open broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BroadcastId(pub u64);

impl fmt::Display for BroadcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "broadcast-{}", self.0)
    }
}

/// Host transport for ephemeral item sets
pub trait BroadcastChannel {
    /// Register `items` as a new broadcast unit. May suspend.
    fn open(&self, items: Vec<Item>) -> impl Future<Output = Result<BroadcastId, ChannelError>>;

    /// Replace the items of an open broadcast.
    ///
    /// Called at pointer-move frequency. Implementations may coalesce
    /// intermediate states but must always deliver the latest one.
    /// Publishing to a closed id does nothing.
    fn publish(&self, id: BroadcastId, items: Vec<Item>);

    /// Tear down a broadcast. Closing twice is a no-op.
    fn close(&self, id: BroadcastId);
}

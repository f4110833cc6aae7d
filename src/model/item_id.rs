// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for scene items.
//!
//! Each `ItemId` is a monotonically increasing `u64` generated from a global
//! atomic counter. IDs give the path, label, markers and buttons of a ruler a
//! stable identity across transaction generations, and let the tool match an
//! event's click target against its confirm/cancel buttons. They are never
//! reused within a process, so a stale target can never alias a live item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a scene item (path, marker, label, button)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(u64);

static ITEM_COUNTER: AtomicU64 = AtomicU64::new(1);

impl ItemId {
    /// Create a new unique item ID
    pub fn next() -> Self {
        Self(ITEM_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, as seen in serialized events
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::next()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = ItemId::next();
        let b = ItemId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = ItemId::next();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.get().to_string());
    }
}

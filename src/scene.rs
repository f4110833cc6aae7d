// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Persistence of committed rulers.
//!
//! The host scene is the only place kept rulers live after `finalize`. The
//! core hands the items over once and forgets them; whatever the store does
//! with them (and any failure doing so) is the store's business.

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

use crate::model::Item;

/// Receiver of permanent items
pub trait SceneStore {
    /// Add `items` to the persisted scene. Fire-and-forget.
    fn add_permanent_objects(&self, items: Vec<Item>);
}

/// One batch of items added by a single commit
#[derive(Debug, Clone, Serialize)]
pub struct Commit {
    /// RFC 3339 timestamp of when the store received the batch
    pub committed_at: String,
    pub items: Vec<Item>,
}

/// Scene store that keeps commits in memory
#[derive(Debug, Default)]
pub struct MemoryScene {
    commits: Mutex<Vec<Commit>>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commits so far, oldest first
    pub fn commits(&self) -> Vec<Commit> {
        self.commits
            .lock()
            .map(|commits| commits.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Every persisted item, across commits
    pub fn items(&self) -> Vec<Item> {
        self.commits().into_iter().flat_map(|c| c.items).collect()
    }
}

impl SceneStore for MemoryScene {
    fn add_permanent_objects(&self, items: Vec<Item>) {
        tracing::info!("Persisting {} items", items.len());
        let commit = Commit {
            committed_at: Utc::now().to_rfc3339(),
            items,
        };
        match self.commits.lock() {
            Ok(mut commits) => commits.push(commit),
            Err(poisoned) => poisoned.into_inner().push(commit),
        }
    }
}

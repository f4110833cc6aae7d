// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! In-process broadcast channel.
//!
//! All live broadcasts sit in one `tokio::sync::watch` value keyed by
//! `BroadcastId`. Observers only ever see the latest value, so a burst of
//! pointer-move publishes collapses into whatever was published last.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::watch;

use super::{BroadcastChannel, BroadcastId};
use crate::error::ChannelError;
use crate::model::{Item, ItemId};

type LiveSet = BTreeMap<BroadcastId, Vec<Item>>;

/// Broadcast channel that keeps everything in memory
#[derive(Debug)]
pub struct LocalBroadcast {
    live: watch::Sender<LiveSet>,
    next_id: AtomicU64,
    failing_opens: AtomicUsize,
    publishes: AtomicU64,
}

impl LocalBroadcast {
    pub fn new() -> Self {
        let (live, _) = watch::channel(LiveSet::new());
        Self {
            live,
            next_id: AtomicU64::new(1),
            failing_opens: AtomicUsize::new(0),
            publishes: AtomicU64::new(0),
        }
    }

    /// Make the next `count` calls to `open` fail
    pub fn fail_next_opens(&self, count: usize) {
        self.failing_opens.store(count, Ordering::SeqCst);
    }

    /// Watch the set of live broadcasts
    pub fn subscribe(&self) -> Observer {
        Observer {
            rx: self.live.subscribe(),
        }
    }

    /// Number of broadcasts currently open
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    /// Total publishes accepted since creation
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::Relaxed)
    }

    fn take_failure(&self) -> bool {
        self.failing_opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for LocalBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastChannel for LocalBroadcast {
    async fn open(&self, items: Vec<Item>) -> Result<BroadcastId, ChannelError> {
        // Stand-in for the host handshake.
        tokio::task::yield_now().await;

        if self.take_failure() {
            tracing::warn!("Local broadcast refused to open ({} items)", items.len());
            return Err(ChannelError("local broadcast refused the open".to_string()));
        }

        let id = BroadcastId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.live.send_modify(|live| {
            live.insert(id, items);
        });
        tracing::debug!("Opened {}", id);
        Ok(id)
    }

    fn publish(&self, id: BroadcastId, items: Vec<Item>) {
        let accepted = self.live.send_if_modified(|live| match live.get_mut(&id) {
            Some(current) => {
                *current = items;
                true
            }
            None => false,
        });
        if accepted {
            self.publishes.fetch_add(1, Ordering::Relaxed);
        } else {
            tracing::trace!("Dropped publish to closed {}", id);
        }
    }

    fn close(&self, id: BroadcastId) {
        let removed = self.live.send_if_modified(|live| live.remove(&id).is_some());
        if removed {
            tracing::debug!("Closed {}", id);
        }
    }
}

/// A viewer of the local broadcast
#[derive(Debug, Clone)]
pub struct Observer {
    rx: watch::Receiver<LiveSet>,
}

impl Observer {
    /// Every item in every live broadcast, in broadcast order
    pub fn snapshot(&self) -> Vec<Item> {
        self.rx.borrow().values().flatten().cloned().collect()
    }

    /// Number of live broadcasts
    pub fn live_count(&self) -> usize {
        self.rx.borrow().len()
    }

    /// Look up one live item by id
    pub fn item(&self, id: ItemId) -> Option<Item> {
        self.rx
            .borrow()
            .values()
            .flatten()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Wait for the next change. Returns `false` once the channel is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelItem, PathItem};
    use kurbo::Point;

    fn label(text: &str) -> Item {
        Item::Label(LabelItem::new(Point::ZERO, text))
    }

    #[tokio::test]
    async fn open_publish_close() {
        let channel = LocalBroadcast::new();
        let observer = channel.subscribe();

        let id = channel.open(vec![label("a")]).await.unwrap();
        assert_eq!(observer.live_count(), 1);

        channel.publish(id, vec![label("b"), Item::Path(PathItem::new())]);
        assert_eq!(observer.snapshot().len(), 2);

        channel.close(id);
        assert_eq!(observer.live_count(), 0);
        channel.close(id);
        assert_eq!(channel.live_count(), 0);
    }

    #[tokio::test]
    async fn observer_sees_the_last_publish() {
        let channel = LocalBroadcast::new();
        let mut observer = channel.subscribe();
        let id = channel.open(vec![label("0")]).await.unwrap();

        for i in 1..=50 {
            channel.publish(id, vec![label(&i.to_string())]);
        }
        assert!(observer.changed().await);
        match observer.snapshot().as_slice() {
            [Item::Label(last)] => assert_eq!(last.text, "50"),
            other => panic!("unexpected snapshot {other:?}"),
        }
    }

    #[tokio::test]
    async fn publish_after_close_is_dropped() {
        let channel = LocalBroadcast::new();
        let id = channel.open(vec![label("a")]).await.unwrap();
        channel.close(id);
        channel.publish(id, vec![label("b")]);
        assert_eq!(channel.live_count(), 0);
        assert_eq!(channel.publish_count(), 0);
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed() {
        let channel = LocalBroadcast::new();
        channel.fail_next_opens(1);
        assert!(channel.open(vec![]).await.is_err());
        assert!(channel.open(vec![]).await.is_ok());
    }
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Ephemeral transactions: a typed item set bound to one open broadcast.
//!
//! A `Transaction` only exists once its broadcast has opened, so holding one
//! is proof that observers can see it. Mutations edit the named fields of
//! the item set and publish the whole set in one go, which keeps every
//! object in the set consistent from an observer's point of view. Closing is
//! idempotent and also happens on drop, so a transaction can never outlive
//! its owner on other viewers' screens.
//!
//! Replacing one transaction with another goes through [`hand_over`], which
//! installs the successor before closing the predecessor.

use std::sync::Arc;

use crate::broadcast::{BroadcastChannel, BroadcastId};
use crate::error::{Result, RulerError};
use crate::model::Item;

/// A named group of items that is broadcast as one unit
pub trait ItemSet {
    /// Flatten into the items observers receive
    fn to_items(&self) -> Vec<Item>;
}

/// One open broadcast of an item set
#[derive(Debug)]
pub struct Transaction<S: ItemSet, C: BroadcastChannel> {
    channel: Arc<C>,
    id: BroadcastId,
    generation: u64,
    items: S,
    closed: bool,
}

impl<S: ItemSet, C: BroadcastChannel> Transaction<S, C> {
    /// Open a broadcast for `items`. Suspends while the channel negotiates.
    pub async fn open(channel: Arc<C>, generation: u64, items: S) -> Result<Self> {
        let id = channel.open(items.to_items()).await?;
        tracing::debug!("Transaction generation {} open as {}", generation, id);
        Ok(Self {
            channel,
            id,
            generation,
            items,
            closed: false,
        })
    }

    pub fn id(&self) -> BroadcastId {
        self.id
    }

    /// Generation tag supplied by the owner when the transaction was opened
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> &S {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Apply `mutator` to the item set and publish the result
    pub fn mutate(&mut self, mutator: impl FnOnce(&mut S)) -> Result<()> {
        if self.closed {
            return Err(RulerError::precondition(format!(
                "mutate on closed transaction {}",
                self.id
            )));
        }
        mutator(&mut self.items);
        self.channel.publish(self.id, self.items.to_items());
        Ok(())
    }

    /// Tear down the broadcast. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.channel.close(self.id);
        tracing::debug!("Transaction generation {} closed", self.generation);
    }
}

impl<S: ItemSet, C: BroadcastChannel> Drop for Transaction<S, C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Install `next` in `slot`, then close whatever was there before.
///
/// `next` is already open, so observers always see at least one of the two.
pub fn hand_over<S: ItemSet, C: BroadcastChannel>(
    slot: &mut Option<Transaction<S, C>>,
    next: Transaction<S, C>,
) {
    if let Some(mut previous) = slot.replace(next) {
        previous.close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ChannelError;
    use crate::model::LabelItem;
    use kurbo::Point;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// What a recording channel saw, in order
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Event {
        Open(BroadcastId, usize),
        Publish(BroadcastId, usize),
        Close(BroadcastId),
    }

    /// Channel that logs every call, for ordering assertions
    #[derive(Debug, Default)]
    pub(crate) struct RecordingChannel {
        next: AtomicU64,
        pub(crate) events: Mutex<Vec<Event>>,
    }

    impl RecordingChannel {
        pub(crate) fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl BroadcastChannel for RecordingChannel {
        async fn open(&self, items: Vec<Item>) -> std::result::Result<BroadcastId, ChannelError> {
            tokio::task::yield_now().await;
            let id = BroadcastId(self.next.fetch_add(1, Ordering::Relaxed));
            self.events.lock().unwrap().push(Event::Open(id, items.len()));
            Ok(id)
        }

        fn publish(&self, id: BroadcastId, items: Vec<Item>) {
            self.events.lock().unwrap().push(Event::Publish(id, items.len()));
        }

        fn close(&self, id: BroadcastId) {
            self.events.lock().unwrap().push(Event::Close(id));
        }
    }

    #[derive(Debug)]
    struct Pair(LabelItem, LabelItem);

    impl ItemSet for Pair {
        fn to_items(&self) -> Vec<Item> {
            vec![Item::Label(self.0.clone()), Item::Label(self.1.clone())]
        }
    }

    fn pair() -> Pair {
        Pair(LabelItem::new(Point::ZERO, "a"), LabelItem::new(Point::ZERO, "b"))
    }

    #[tokio::test]
    async fn mutate_publishes_whole_set() {
        let channel = Arc::new(RecordingChannel::default());
        let mut tx = Transaction::open(channel.clone(), 0, pair()).await.unwrap();
        tx.mutate(|pair| pair.0.text = "changed".to_string()).unwrap();

        assert_eq!(tx.items().0.text, "changed");
        assert_eq!(
            channel.events(),
            vec![Event::Open(tx.id(), 2), Event::Publish(tx.id(), 2)]
        );
    }

    #[tokio::test]
    async fn close_is_idempotent_and_blocks_mutation() {
        let channel = Arc::new(RecordingChannel::default());
        let mut tx = Transaction::open(channel.clone(), 0, pair()).await.unwrap();
        let id = tx.id();
        tx.close();
        tx.close();
        assert!(!tx.is_open());
        assert!(matches!(
            tx.mutate(|_| {}),
            Err(RulerError::PreconditionViolation(_))
        ));
        drop(tx);
        assert_eq!(channel.events(), vec![Event::Open(id, 2), Event::Close(id)]);
    }

    #[tokio::test]
    async fn drop_closes() {
        let channel = Arc::new(RecordingChannel::default());
        let tx = Transaction::open(channel.clone(), 0, pair()).await.unwrap();
        let id = tx.id();
        drop(tx);
        assert_eq!(channel.events().last(), Some(&Event::Close(id)));
    }

    #[tokio::test]
    async fn hand_over_opens_before_closing() {
        let channel = Arc::new(RecordingChannel::default());
        let mut slot = Some(Transaction::open(channel.clone(), 0, pair()).await.unwrap());
        let first = slot.as_ref().unwrap().id();

        let next = Transaction::open(channel.clone(), 1, pair()).await.unwrap();
        let second = next.id();
        hand_over(&mut slot, next);

        assert_eq!(slot.as_ref().unwrap().generation(), 1);
        assert_eq!(
            channel.events(),
            vec![
                Event::Open(first, 2),
                Event::Open(second, 2),
                Event::Close(first),
            ]
        );
    }
}

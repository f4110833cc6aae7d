// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Keep/cancel buttons that follow the ruler's last waypoint

use kurbo::{Point, Vec2};

use crate::model::{Item, ItemId, LabelItem};
use crate::settings;
use crate::transaction::ItemSet;

/// Which button a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Keep,
    Cancel,
}

/// The keep/cancel button pair
#[derive(Debug, Clone, PartialEq)]
pub struct AffordanceItems {
    pub keep: LabelItem,
    pub cancel: LabelItem,
}

impl AffordanceItems {
    /// Buttons placed above `anchor`: keep to the left, cancel to the right
    pub fn new(anchor: Point) -> Self {
        Self {
            keep: LabelItem::new(keep_position(anchor), settings::affordance::KEEP_TEXT),
            cancel: LabelItem::new(cancel_position(anchor), settings::affordance::CANCEL_TEXT),
        }
    }

    /// Move both buttons to sit above a new anchor point
    pub fn move_to(&mut self, anchor: Point) {
        self.keep.position = keep_position(anchor);
        self.cancel.position = cancel_position(anchor);
    }

    /// Match a click target against the buttons
    pub fn hit(&self, target: ItemId) -> Option<Affordance> {
        if target == self.keep.id {
            Some(Affordance::Keep)
        } else if target == self.cancel.id {
            Some(Affordance::Cancel)
        } else {
            None
        }
    }
}

impl ItemSet for AffordanceItems {
    fn to_items(&self) -> Vec<Item> {
        vec![Item::Label(self.keep.clone()), Item::Label(self.cancel.clone())]
    }
}

fn keep_position(anchor: Point) -> Point {
    anchor + Vec2::new(-settings::affordance::OFFSET_X, settings::affordance::OFFSET_Y)
}

fn cancel_position(anchor: Point) -> Point {
    anchor + Vec2::new(settings::affordance::OFFSET_X, settings::affordance::OFFSET_Y)
}

// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Scene item model shared by rulers, broadcasts and the scene store

pub mod item;
pub mod item_id;

pub use item::{Item, Layer, LabelItem, MarkerItem, PathItem, StrokeStyle, TextItem};
pub use item_id::ItemId;

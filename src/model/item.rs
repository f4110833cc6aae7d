// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Visual scene items.
//!
//! These are the objects a ruler puts on the surface: one dashed path, a
//! circle marker per waypoint, a distance label, and the two confirm/cancel
//! buttons owned by the tool. Items carry their own `ItemId` so the same
//! object keeps its identity when it is re-registered with a newer broadcast
//! transaction. Everything here serializes, since items are what observers
//! receive and what the scene store persists.

use kurbo::{BezPath, Circle, Point};
use peniko::Color;
use serde::Serialize;

use super::ItemId;
use crate::{settings, theme};

/// Scene layer an item is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    /// Measurement visuals
    Ruler,
    /// Interactive tool controls, above everything else
    Control,
}

/// Stroke style for the ruler path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    #[serde(with = "color_hex")]
    pub color: Color,
    pub width: f64,
    pub dash: [f64; 2],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: theme::path::STROKE,
            width: theme::path::WIDTH,
            dash: theme::path::DASH,
        }
    }
}

/// The polyline through all waypoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    pub id: ItemId,
    pub layer: Layer,
    pub commands: BezPath,
    pub stroke: StrokeStyle,
}

impl PathItem {
    /// An empty ruler path with the default dashed style
    pub fn new() -> Self {
        Self {
            id: ItemId::next(),
            layer: Layer::Ruler,
            commands: BezPath::new(),
            stroke: StrokeStyle::default(),
        }
    }
}

impl Default for PathItem {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed-size circle drawn on a committed waypoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerItem {
    pub id: ItemId,
    pub layer: Layer,
    pub attached_to: ItemId,
    pub circle: Circle,
    #[serde(with = "color_hex")]
    pub fill: Color,
    pub disable_hit: bool,
}

impl MarkerItem {
    /// A marker centred on `center`, attached to the ruler path
    pub fn new(center: Point, path: ItemId) -> Self {
        Self {
            id: ItemId::next(),
            layer: Layer::Ruler,
            attached_to: path,
            circle: Circle::new(center, settings::ruler::MARKER_RADIUS),
            fill: theme::marker::FILL,
            disable_hit: true,
        }
    }

    pub fn center(&self) -> Point {
        self.circle.center
    }
}

/// Plain floating text, used for the distance label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub id: ItemId,
    pub layer: Layer,
    pub attached_to: ItemId,
    pub position: Point,
    pub text: String,
    pub font_size: f64,
    #[serde(with = "color_hex")]
    pub color: Color,
}

impl TextItem {
    /// An empty label attached to the ruler path
    pub fn new(path: ItemId) -> Self {
        Self {
            id: ItemId::next(),
            layer: Layer::Ruler,
            attached_to: path,
            position: Point::ZERO,
            text: String::new(),
            font_size: settings::ruler::LABEL_FONT_SIZE,
            color: theme::label::TEXT,
        }
    }
}

/// A clickable label with a background bubble (confirm/cancel buttons)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelItem {
    pub id: ItemId,
    pub layer: Layer,
    pub position: Point,
    pub text: String,
    pub pointer_height: f64,
    #[serde(with = "color_hex")]
    pub text_color: Color,
    #[serde(with = "color_hex")]
    pub background: Color,
}

impl LabelItem {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: ItemId::next(),
            layer: Layer::Control,
            position,
            text: text.into(),
            pointer_height: 0.0,
            text_color: theme::label::BUTTON_TEXT,
            background: theme::label::BUTTON_BACKGROUND,
        }
    }
}

/// Any item that can be broadcast or persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Item {
    Path(PathItem),
    Marker(MarkerItem),
    Text(TextItem),
    Label(LabelItem),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Path(item) => item.id,
            Item::Marker(item) => item.id,
            Item::Text(item) => item.id,
            Item::Label(item) => item.id,
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            Item::Path(item) => item.layer,
            Item::Marker(item) => item.layer,
            Item::Text(item) => item.layer,
            Item::Label(item) => item.layer,
        }
    }
}

/// Serialize colors as `#rrggbbaa`
mod color_hex {
    use peniko::Color;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        let rgba = color.to_rgba8();
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            rgba.r, rgba.g, rgba.b, rgba.a
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_uses_configured_radius() {
        let path = PathItem::new();
        let marker = MarkerItem::new(Point::new(25.0, 75.0), path.id);
        assert_eq!(marker.circle.radius, settings::ruler::MARKER_RADIUS);
        assert_eq!(marker.center(), Point::new(25.0, 75.0));
        assert_eq!(marker.attached_to, path.id);
        assert!(marker.disable_hit);
    }

    #[test]
    fn item_serializes_with_type_tag() {
        let label = LabelItem::new(Point::new(1.0, 2.0), "ok");
        let json = serde_json::to_value(Item::Label(label)).unwrap();
        assert_eq!(json["type"], "label");
        assert_eq!(json["layer"], "CONTROL");
        assert_eq!(json["text"], "ok");
    }

    #[test]
    fn colors_serialize_as_hex() {
        let path = PathItem::new();
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json["stroke"]["color"], "#808080ff");
    }
}

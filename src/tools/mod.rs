// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool layer: the input surface and the bendy ruler tool

mod affordance;
mod observer;
mod ruler_tool;

pub use affordance::{Affordance, AffordanceItems};
pub use observer::{LifecycleEvent, LifecycleLog, LifecycleObserver, TracingObserver};
pub use ruler_tool::{RulerTool, ToolState};

use kurbo::Point;
use serde::Deserialize;

use crate::model::ItemId;
use crate::settings;

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Multi-waypoint measuring ruler
    BendyRuler,
}

impl ToolId {
    /// Identifier the host registers the tool mode under
    pub fn as_str(self) -> &'static str {
        match self {
            ToolId::BendyRuler => settings::tool::ID,
        }
    }

    /// Keyboard shortcut that activates the tool
    pub fn shortcut(self) -> char {
        match self {
            ToolId::BendyRuler => settings::tool::SHORTCUT,
        }
    }

    /// Look a tool up by its shortcut (case-insensitive)
    pub fn from_shortcut(key: char) -> Option<Self> {
        [ToolId::BendyRuler]
            .into_iter()
            .find(|tool| tool.shortcut().eq_ignore_ascii_case(&key))
    }
}

// ===== Input Events =====

/// Key names the tool reacts to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    #[serde(untagged)]
    Other(String),
}

/// Everything the tool consumes from the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolEvent {
    /// Pointer click, with the id of the item under the pointer if any
    Click {
        position: Point,
        #[serde(default)]
        target: Option<ItemId>,
    },
    /// Pointer moved
    Move { position: Point },
    DoubleClick { position: Point },
    KeyDown { key: Key },
    /// The host switched away from this tool
    Deactivate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_lookup() {
        assert_eq!(ToolId::from_shortcut('b'), Some(ToolId::BendyRuler));
        assert_eq!(ToolId::from_shortcut('B'), Some(ToolId::BendyRuler));
        assert_eq!(ToolId::from_shortcut('x'), None);
        assert_eq!(ToolId::BendyRuler.as_str(), "bendy-ruler");
    }

    #[test]
    fn events_parse_from_json() {
        let events: Vec<ToolEvent> = serde_json::from_str(
            r#"[
                {"click": {"position": {"x": 10, "y": 20}}},
                {"click": {"position": {"x": 0, "y": 0}, "target": 7}},
                {"move": {"position": {"x": 1.5, "y": 2}}},
                {"double-click": {"position": {"x": 0, "y": 0}}},
                {"key-down": {"key": "Escape"}},
                {"key-down": {"key": "Shift"}},
                "deactivate"
            ]"#,
        )
        .unwrap();

        assert_eq!(
            events[0],
            ToolEvent::Click {
                position: Point::new(10.0, 20.0),
                target: None
            }
        );
        match &events[1] {
            ToolEvent::Click { target: Some(id), .. } => assert_eq!(id.get(), 7),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(events[4], ToolEvent::KeyDown { key: Key::Escape });
        assert_eq!(
            events[5],
            ToolEvent::KeyDown {
                key: Key::Other("Shift".to_string())
            }
        );
        assert_eq!(events[6], ToolEvent::Deactivate);
    }
}

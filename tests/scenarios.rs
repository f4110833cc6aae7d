// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end measuring sessions through the public API

use std::sync::Arc;

use bendy_ruler::broadcast::LocalBroadcast;
use bendy_ruler::grid::{Grid, GridConfig, GridHandle, GridPolicy, GridScale, SharedGrid};
use bendy_ruler::model::{Item, Layer};
use bendy_ruler::ruler::{FinalizeOutcome, Installed, Ruler, RulerState};
use bendy_ruler::scene::MemoryScene;
use bendy_ruler::tools::{Key, LifecycleEvent, LifecycleLog, RulerTool, ToolEvent, ToolState};
use bendy_ruler::RulerError;
use kurbo::{PathEl, Point};

fn five_foot_grid() -> SharedGrid {
    Grid::square(50.0, GridScale::new(5.0, "ft"), 0)
        .unwrap()
        .shared()
}

fn click(x: f64, y: f64) -> ToolEvent {
    ToolEvent::Click {
        position: Point::new(x, y),
        target: None,
    }
}

fn moved(x: f64, y: f64) -> ToolEvent {
    ToolEvent::Move {
        position: Point::new(x, y),
    }
}

#[tokio::test]
async fn two_cells_read_ten_feet() {
    let channel = Arc::new(LocalBroadcast::new());
    let observer = channel.subscribe();
    let mut ruler = Ruler::create(Point::ZERO, five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();
    ruler.add_point(Point::new(100.0, 0.0)).await.unwrap();

    assert_eq!(ruler.distance(), 2.0);
    assert_eq!(ruler.label_text(), "10ft");
    let label = observer
        .snapshot()
        .into_iter()
        .find_map(|item| match item {
            Item::Text(text) => Some(text),
            _ => None,
        })
        .unwrap();
    assert_eq!(label.text, "10ft");
    assert_eq!(label.position, Point::new(50.0, 0.0));
}

#[tokio::test]
async fn single_point_finalize_persists_nothing() {
    let channel = Arc::new(LocalBroadcast::new());
    let scene = MemoryScene::new();
    let mut ruler = Ruler::create(Point::new(25.0, 25.0), five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();

    assert_eq!(ruler.finalize(&scene).unwrap(), FinalizeOutcome::Discarded);
    assert!(scene.commits().is_empty());
    assert_eq!(channel.live_count(), 0);
}

#[tokio::test]
async fn add_point_during_pending_preview_ends_on_new_marker_set() {
    let channel = Arc::new(LocalBroadcast::new());
    let observer = channel.subscribe();
    let mut ruler = Ruler::create(Point::ZERO, five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();

    ruler.preview_to(Some(Point::new(50.0, 0.0))).unwrap();
    ruler.add_point(Point::new(100.0, 0.0)).await.unwrap();

    let items = observer.snapshot();
    let markers = items
        .iter()
        .filter(|item| matches!(item, Item::Marker(_)))
        .count();
    assert_eq!(markers, 2);
    assert_eq!(observer.live_count(), 1);
}

#[tokio::test]
async fn cancel_twice_is_a_no_op() {
    let channel = Arc::new(LocalBroadcast::new());
    let mut ruler = Ruler::create(Point::ZERO, five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();
    ruler.cancel();
    ruler.cancel();
    assert_eq!(ruler.state(), RulerState::Cancelled);
}

#[tokio::test]
async fn moves_after_finalize_are_rejected() {
    let channel = Arc::new(LocalBroadcast::new());
    let scene = MemoryScene::new();
    let mut ruler = Ruler::create(Point::ZERO, five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();
    ruler.add_point(Point::new(0.0, 150.0)).await.unwrap();
    ruler.finalize(&scene).unwrap();

    let err = ruler.preview_to(Some(Point::new(10.0, 10.0))).unwrap_err();
    assert!(matches!(err, RulerError::PreconditionViolation(_)));
}

#[tokio::test]
async fn cancel_while_reopen_in_flight_leaves_nothing_live() {
    let channel = Arc::new(LocalBroadcast::new());
    let mut ruler = Ruler::create(Point::ZERO, five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();

    let pending = ruler.stage_point(Point::new(50.0, 50.0)).unwrap();
    let (opened, ()) = tokio::join!(pending.open(), async {
        ruler.cancel();
    });

    assert_eq!(ruler.install(opened.unwrap()).unwrap(), Installed::Stale);
    assert_eq!(channel.live_count(), 0);
}

#[test]
fn measurement_properties_hold_across_grids() {
    let configs = [
        "kind = \"square\"\ncell-size = 50.0",
        "kind = \"square\"\ncell-size = 70.0\nmeasurement = \"alternating\"",
        "kind = \"square\"\nmeasurement = \"euclidean\"",
        "kind = \"hex-vertical\"\ncell-size = 60.0",
        "kind = \"hex-horizontal\"\ncell-size = 60.0",
    ];
    let points = [
        Point::new(0.0, 0.0),
        Point::new(13.0, -7.5),
        Point::new(212.0, 99.0),
        Point::new(-340.25, 18.0),
    ];

    for source in configs {
        let grid = Grid::from_config(&GridConfig::from_toml_str(source).unwrap()).unwrap();
        for &a in &points {
            assert_eq!(grid.measure(a, a), 0.0, "{source}");
            let mode = grid.resolve_snap_mode(a);
            let snapped = grid.snap(a, mode);
            assert!((grid.snap(snapped, mode) - snapped).hypot() < 1e-9, "{source}");
            for &b in &points {
                assert_eq!(grid.measure(a, b), grid.measure(b, a), "{source}");
            }
        }
    }
}

#[tokio::test]
async fn full_session_through_the_tool() {
    let channel = Arc::new(LocalBroadcast::new());
    let observer = channel.subscribe();
    let scene = Arc::new(MemoryScene::new());
    let log = Arc::new(LifecycleLog::new());
    let mut tool = RulerTool::new(
        Arc::clone(&channel),
        Arc::clone(&scene),
        GridHandle::fixed(five_foot_grid()),
    )
    .with_observer(log.clone());

    for event in [
        click(0.0, 0.0),
        moved(30.0, 5.0),
        moved(60.0, 5.0),
        click(100.0, 0.0),
        moved(100.0, 60.0),
        click(100.0, 100.0),
        moved(180.0, 110.0),
    ] {
        tool.handle(event).await.unwrap();
    }

    let ruler = tool.ruler().unwrap();
    assert_eq!(ruler.waypoints().len(), 3);
    assert_eq!(
        observer
            .snapshot()
            .iter()
            .filter(|item| item.layer() == Layer::Control)
            .count(),
        2
    );

    tool.handle(ToolEvent::KeyDown { key: Key::Enter }).await.unwrap();

    assert_eq!(tool.state(), ToolState::Idle);
    assert_eq!(observer.live_count(), 0);
    let commits = scene.commits();
    assert_eq!(commits.len(), 1);
    let path = commits[0]
        .items
        .iter()
        .find_map(|item| match item {
            Item::Path(path) => Some(path),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        path.commands.elements(),
        &[
            PathEl::MoveTo(Point::ZERO),
            PathEl::LineTo(Point::new(100.0, 0.0)),
            PathEl::LineTo(Point::new(100.0, 100.0)),
        ]
    );
    assert!(commits[0].items.iter().all(|item| item.layer() == Layer::Ruler));
    assert_eq!(
        log.events(),
        vec![
            LifecycleEvent::Started { start: Point::ZERO },
            LifecycleEvent::Kept {
                distance: 4.0,
                label: "20ft".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn committed_items_serialize_for_the_host() {
    let channel = Arc::new(LocalBroadcast::new());
    let scene = MemoryScene::new();
    let mut ruler = Ruler::create(Point::ZERO, five_foot_grid(), Arc::clone(&channel))
        .await
        .unwrap();
    ruler.add_point(Point::new(50.0, 50.0)).await.unwrap();
    ruler.finalize(&scene).unwrap();

    let json = serde_json::to_value(scene.commits()).unwrap();
    let items = json[0]["items"].as_array().unwrap();
    assert_eq!(items[0]["type"], "path");
    assert_eq!(items[0]["layer"], "RULER");
    assert_eq!(items[1]["type"], "text");
    assert_eq!(items[1]["text"], "5ft");
    assert_eq!(items[2]["type"], "marker");
}

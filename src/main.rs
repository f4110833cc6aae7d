// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Replay a scripted input session through the bendy ruler tool and print
//! the rulers that were kept, as JSON.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use bendy_ruler::broadcast::LocalBroadcast;
use bendy_ruler::grid::{Grid, GridConfig, GridHandle};
use bendy_ruler::scene::MemoryScene;
use bendy_ruler::tools::{RulerTool, ToolEvent, ToolState, TracingObserver};

const USAGE: &str = "usage: bendy-ruler [--grid grid.toml] [events.json]";

/// Which button a scripted click presses
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Button {
    Keep,
    Cancel,
}

/// One line of a replay script.
///
/// Button ids are only known at run time, so scripted clicks name the
/// button instead; everything else is a plain tool event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Step {
    Press { button: Button },
    #[serde(untagged)]
    Event(ToolEvent),
}

struct Args {
    grid: Option<PathBuf>,
    events: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        grid: None,
        events: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--grid" => {
                let path = iter.next().context("--grid needs a path")?;
                args.grid = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ if args.events.is_none() && !arg.starts_with('-') => {
                args.events = Some(PathBuf::from(arg));
            }
            _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
        }
    }
    Ok(args)
}

fn read_script(path: Option<&PathBuf>) -> Result<Vec<Step>> {
    let source = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read events from {}", path.display()))?,
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read events from stdin")?;
            source
        }
    };
    serde_json::from_str(&source).context("Failed to parse event script")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    bendy_ruler::init_tracing();

    let args = parse_args()?;
    let config = match &args.grid {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };
    let grid = Grid::from_config(&config).context("Invalid grid configuration")?;
    let steps = read_script(args.events.as_ref())?;

    let channel = Arc::new(LocalBroadcast::new());
    let scene = Arc::new(MemoryScene::new());
    let mut tool = RulerTool::new(
        Arc::clone(&channel),
        Arc::clone(&scene),
        GridHandle::fixed(grid.shared()),
    )
    .with_observer(Arc::new(TracingObserver));

    for (index, step) in steps.into_iter().enumerate() {
        let event = match step {
            Step::Event(event) => event,
            Step::Press { button } => {
                let Some(buttons) = tool.affordances() else {
                    tracing::warn!("Step {}: no ruler to press {:?} on", index, button);
                    continue;
                };
                let label = match button {
                    Button::Keep => &buttons.keep,
                    Button::Cancel => &buttons.cancel,
                };
                ToolEvent::Click {
                    position: label.position,
                    target: Some(label.id),
                }
            }
        };
        if let Err(e) = tool.handle(event).await {
            tracing::warn!("Step {} failed: {}", index, e);
        }
    }

    if tool.state() == ToolState::Drawing {
        tracing::info!("Script ended mid-ruler, deactivating");
        tool.on_deactivate();
    }

    let output =
        serde_json::to_string_pretty(&scene.commits()).context("Failed to serialize commits")?;
    println!("{output}");
    Ok(())
}

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use event_bus::EventBus;
use operators::Registry;
use screen_core::{AssetStore, DirAssetStore};
use serde::Serialize;
use shared::domain::{OperationKind, ScreenId};

mod config;
mod runner;
mod terminal;

use config::{load_settings, resolve_asset_dir};
use runner::{run_screen, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "showcase", about = "Reactive stream operator demonstrations")]
struct Cli {
    /// Configuration file (defaults to ./showcase.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the `<Screen>.txt` source listings.
    #[arg(long)]
    asset_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every demonstration screen.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Run a single screen by name, e.g. `MapOperator`.
    Run {
        screen: String,
        /// How long a continuous screen runs before stop is pressed.
        #[arg(long)]
        run_ms: Option<u64>,
        /// Show the source listing instead of the instructions.
        #[arg(long)]
        source: bool,
    },
    /// Run every one-shot screen in catalog order.
    RunAll,
}

#[derive(Debug, Serialize)]
struct ScreenSummary {
    id: ScreenId,
    title: &'static str,
    kind: OperationKind,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref());
    if let Some(asset_dir) = cli.asset_dir {
        settings.asset_dir = asset_dir;
    }
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let registry = Registry::builtin();

    match cli.command {
        Command::List { json } => {
            let summaries = registry
                .iter()
                .map(|def| ScreenSummary {
                    id: def.id,
                    title: def.title,
                    kind: def.kind(),
                })
                .collect::<Vec<_>>();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for summary in summaries {
                    let kind = match summary.kind {
                        OperationKind::OneShot => "one-shot",
                        OperationKind::Continuous => "continuous",
                    };
                    println!("{:<24} {:<10} {}", summary.id, kind, summary.title);
                }
            }
        }
        Command::Run {
            screen,
            run_ms,
            source,
        } => {
            let definition = *registry
                .find(&screen)
                .with_context(|| format!("cannot run '{screen}'"))?;
            let assets = open_assets(&settings.asset_dir)?;
            let options = RunOptions {
                run_for: run_ms
                    .map(std::time::Duration::from_millis)
                    .unwrap_or_else(|| settings.continuous_run()),
                show_source: source,
            };
            let bus = EventBus::with_capacity(settings.bus_capacity);
            let report = run_screen(definition, assets, bus, &options).await;
            println!(
                "{}: {} line(s), {} error(s)",
                report.screen, report.lines, report.errors
            );
        }
        Command::RunAll => {
            let assets = open_assets(&settings.asset_dir)?;
            let options = RunOptions {
                run_for: settings.continuous_run(),
                show_source: false,
            };
            let bus = EventBus::with_capacity(settings.bus_capacity);
            let mut failed = Vec::new();
            for definition in registry.iter().filter(|def| !def.is_continuous_operation()) {
                let report =
                    run_screen(*definition, Arc::clone(&assets), bus.clone(), &options).await;
                if report.errors > 0 {
                    failed.push(report.screen);
                }
                println!();
            }
            println!(
                "ran {} screen(s); {} ended with an error line",
                registry.iter().filter(|def| !def.is_continuous_operation()).count(),
                failed.len()
            );
        }
    }

    Ok(())
}

fn open_assets(asset_dir: &std::path::Path) -> Result<Arc<dyn AssetStore>> {
    let root = resolve_asset_dir(asset_dir)?;
    Ok(Arc::new(DirAssetStore::new(root)))
}

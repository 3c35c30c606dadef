//! portfolio3d - an interactive 3D portfolio page
//!
//! Opens the page in a window, or replays a pointer script headlessly.

use anyhow::{Context, Result};
use clap::Parser;
use portfolio3d::config::{PortfolioConfig, DEFAULT_CONFIG_PATH};
use portfolio3d::headless::{self, HeadlessConfig};
use portfolio3d::pointer_script::PointerScript;
use portfolio3d::window;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "portfolio3d", version, about = "Interactive 3D portfolio page")]
struct Args {
    /// Configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Replay this pointer script without opening a window.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Run headless for this many frames (after the script, if any).
    #[arg(long)]
    frames: Option<u32>,
    /// Write a JSONL log of dispatches and actions (headless only).
    #[arg(long)]
    report: Option<PathBuf>,
    /// Override the starfield seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Hand clicked links to the system browser.
    #[arg(long)]
    open_links: bool,
    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    // WARN by default, RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Starting portfolio3d v{}", env!("CARGO_PKG_VERSION"));

    let mut config = PortfolioConfig::load_from_path(&args.config);
    if let Some(seed) = args.seed {
        config.scene.seed = Some(seed);
    }
    if args.open_links {
        config.links.open_urls = true;
    }

    if args.write_config {
        config
            .save_to_path(&args.config)
            .with_context(|| format!("failed to write {}", args.config.display()))?;
        println!("wrote {}", args.config.display());
        return Ok(());
    }

    if args.script.is_none() && args.frames.is_none() {
        if args.report.is_some() {
            tracing::warn!("--report has no effect without --script or --frames");
        }
        return window::run(config);
    }

    let script = args
        .script
        .as_deref()
        .map(PointerScript::from_path)
        .transpose()?;
    let summary = headless::run(HeadlessConfig {
        portfolio: config,
        script,
        trailing_frames: args.frames.unwrap_or(0),
        report: args.report,
    })?;
    print!("{summary}");
    Ok(())
}

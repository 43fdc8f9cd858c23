//! `glide`: drive the portfolio page headlessly and print what happened.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glide_config::GlideConfig;
use glide_portfolio::{ActionHandler, Content, DriverOptions, OutboundAction, RecordingActions, RunReport};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-reactive portfolio page, driven headlessly")]
struct Cli {
    /// Config file (defaults to `glide.toml` when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long)]
    frames: Option<u32>,

    /// Synthetic scroll speed in px per second.
    #[arg(long)]
    scroll_speed: Option<f64>,

    /// Simulate a touch-only device.
    #[arg(long)]
    coarse_pointer: bool,

    /// Treat hovering a link as clicking it.
    #[arg(long)]
    clicks: bool,

    /// Write copy-to-clipboard actions to the system clipboard.
    #[arg(long)]
    clipboard: bool,

    /// Print the full run report as JSON.
    #[arg(long)]
    dump: bool,
}

/// Records every action and performs clipboard copies for real.
struct ClipboardActions {
    recorder: RecordingActions,
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardActions {
    fn new() -> Self {
        Self {
            recorder: RecordingActions::new(),
            clipboard: None,
        }
    }
}

impl ActionHandler for ClipboardActions {
    fn dispatch(&mut self, action: &OutboundAction) -> Result<()> {
        self.recorder.dispatch(action)?;
        if let OutboundAction::CopyToClipboard(text) = action {
            if self.clipboard.is_none() {
                self.clipboard = Some(arboard::Clipboard::new().context("opening clipboard")?);
            }
            if let Some(clipboard) = self.clipboard.as_mut() {
                clipboard.set_text(text.clone()).context("writing clipboard")?;
            }
            debug!(len = text.len(), "copied to clipboard");
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GlideConfig::load(cli.config.as_deref())?;
    if let Some(frames) = cli.frames {
        config.demo.frames = frames;
    }
    if let Some(speed) = cli.scroll_speed {
        config.demo.scroll_speed = speed;
    }
    if cli.coarse_pointer {
        config.demo.coarse_pointer = true;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let options = DriverOptions {
        clicks: cli.clicks,
        ..DriverOptions::from_config(&config)
    };
    info!(?options, "starting run");

    let content = Content::default();
    let report = if cli.clipboard {
        glide_portfolio::run(&content, &options, &mut ClipboardActions::new())?
    } else {
        glide_portfolio::run(&content, &options, &mut RecordingActions::new())?
    };

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if report.leaked > 0 {
        anyhow::bail!("{} registrations survived unmount", report.leaked);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "{} frames, scroll {:.0}/{:.0}px",
        report.frames, report.final_scroll, report.max_scroll
    );
    println!(
        "playbacks: {} started, {} completed, {} cancelled, {} reversed, {} repeats",
        report.started, report.completed, report.cancelled, report.reversed, report.repeated
    );
    println!(
        "{} commands applied, {} hover enters, {} actions",
        report.commands_applied,
        report.hover_enters,
        report.actions.len()
    );
    for action in &report.actions {
        println!("  {action:?}");
    }
    for (section, elements) in &report.elements {
        println!("[{section}] {} elements", elements.len());
    }
}

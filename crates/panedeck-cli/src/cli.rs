//! CLI entry and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use panedeck_core::config::{self, Config};
use panedeck_core::{RedrawHandle, logging, redraw};
use panedeck_tui::{Dashboard, DashboardRuntime, Widget};

use crate::widgets;

#[derive(Parser)]
#[command(name = "panedeck")]
#[command(version = "0.1")]
#[command(about = "Multi-panel terminal dashboard")]
struct Cli {
    /// Config file (default: $PANEDECK_HOME/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Validate the config, list the widgets and exit
    #[arg(long)]
    check: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.check {
        return check(&config);
    }

    let _log_guard = logging::init(&config.log_dir())?;
    tracing::info!(title = %config.dashboard.title, "starting panedeck");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let _enter = rt.enter();

    let (redraw, redraw_rx) = redraw::channel();
    let widgets = build_widgets(&config, &redraw)?;
    let dashboard = Dashboard::new(config.dashboard.title.clone(), widgets, redraw);

    let mut runtime = DashboardRuntime::new(dashboard, redraw_rx)?;
    runtime.run()
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from(path)
        }
        None => Config::load().with_context(|| {
            format!("Failed to load {}", config::paths::config_path().display())
        }),
    }
}

fn build_widgets(config: &Config, redraw: &RedrawHandle) -> Result<Vec<Box<dyn Widget>>> {
    config
        .enabled_widgets()
        .map(|widget| {
            widgets::build(widget, redraw.clone())
                .with_context(|| format!("Failed to build widget '{}'", widget.name))
        })
        .collect()
}

fn check(config: &Config) -> Result<()> {
    let (redraw, _rx) = redraw::channel();
    build_widgets(config, &redraw)?;

    println!("{}: {} widget(s)", config.dashboard.title, config.widgets.len());
    for widget in &config.widgets {
        let p = widget.position;
        println!(
            "  {:<16} {:<10} every {:>4}s  at {},{} size {}x{}{}",
            widget.name,
            widget.kind,
            widget.refresh_interval,
            p.top,
            p.left,
            p.width,
            p.height,
            if widget.enabled { "" } else { "  (disabled)" },
        );
    }
    Ok(())
}

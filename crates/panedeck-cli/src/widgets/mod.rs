//! Widget factory. Maps a config entry's `type` to a concrete panel.

mod clock;
mod sources;

use anyhow::Result;
use panedeck_core::RedrawHandle;
use panedeck_core::config::WidgetConfig;
use panedeck_tui::Widget;

pub fn build(config: &WidgetConfig, redraw: RedrawHandle) -> Result<Box<dyn Widget>> {
    let widget: Box<dyn Widget> = match config.kind.as_str() {
        clock::KIND => Box::new(clock::new(config, redraw)),
        sources::KIND => Box::new(sources::new(config, redraw)?),
        other => anyhow::bail!("Unknown widget type '{other}'"),
    };
    tracing::debug!(name = %config.name, kind = %config.kind, "widget built");
    Ok(widget)
}

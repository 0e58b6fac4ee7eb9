//! Clock: shows the local time, refreshed on its interval.

use std::sync::Arc;

use chrono::Local;
use panedeck_core::config::WidgetConfig;
use panedeck_core::{ContentBuffer, RedrawHandle};
use panedeck_tui::{Panel, PanelBase};

pub const KIND: &str = "clock";

const DEFAULT_FORMAT: &str = "%H:%M:%S\n%A %d %B %Y";

pub fn new(config: &WidgetConfig, redraw: RedrawHandle) -> Panel<()> {
    let format = config
        .option_str("format")
        .unwrap_or(DEFAULT_FORMAT)
        .to_string();
    let content = ContentBuffer::new();

    let buffer = content.clone();
    let refresh = Arc::new(move || {
        buffer.store(Local::now().format(&format).to_string());
        redraw.request_redraw();
    });

    let base = PanelBase::new(config.settings(), content).with_refresh(refresh);
    Panel::new(base, ())
}

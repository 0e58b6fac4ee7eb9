//! Sources: cycles through a configured list of named sources.
//!
//! `h`/`Left` and `l`/`Right` change the selection and refresh immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use crossterm::event::KeyCode;
use panedeck_core::config::WidgetConfig;
use panedeck_core::{ContentBuffer, RedrawHandle};
use panedeck_tui::{Panel, PanelBase, UiEffect, Widget};

pub const KIND: &str = "sources";

#[derive(Debug)]
pub struct Sources {
    names: Arc<Vec<String>>,
    selected: Arc<AtomicUsize>,
}

impl Sources {
    pub fn selected(&self) -> usize {
        self.selected.load(Ordering::SeqCst)
    }

    fn step(&self, forward: bool) {
        let len = self.names.len();
        if len == 0 {
            return;
        }
        let current = self.selected();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.selected.store(next, Ordering::SeqCst);
    }
}

pub fn new(config: &WidgetConfig, redraw: RedrawHandle) -> Result<Panel<Sources>> {
    let names = config.option_strings("sources");
    if names.is_empty() {
        anyhow::bail!("'sources' option must list at least one source");
    }

    let state = Sources {
        names: Arc::new(names),
        selected: Arc::new(AtomicUsize::new(0)),
    };
    let content = ContentBuffer::new();

    let buffer = content.clone();
    let names = Arc::clone(&state.names);
    let selected = Arc::clone(&state.selected);
    let refresh = Arc::new(move || {
        buffer.store(render_list(&names, selected.load(Ordering::SeqCst)));
        redraw.request_redraw();
    });

    let base = PanelBase::new(config.settings(), content).with_refresh(refresh);
    let mut panel = Panel::new(base, state);

    panel.bind_char("h", prev_source, "Select previous source");
    panel.bind_char("l", next_source, "Select next source");
    panel.bind_key(KeyCode::Left, prev_source, "Select previous source");
    panel.bind_key(KeyCode::Right, next_source, "Select next source");

    Ok(panel)
}

fn prev_source(panel: &mut Panel<Sources>) -> Option<UiEffect> {
    panel.state.step(false);
    panel.refresh();
    None
}

fn next_source(panel: &mut Panel<Sources>) -> Option<UiEffect> {
    panel.state.step(true);
    panel.refresh();
    None
}

fn render_list(names: &[String], selected: usize) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let marker = if i == selected { ">" } else { " " };
            format!("{marker} {name}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Read-only table of a widget's identity, settings and refresh timing.
//!
//! Built once from the capability contract when the overlay opens; reopening
//! takes a fresh snapshot.

use crossterm::event::KeyEvent;
use panedeck_core::WidgetCapability;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Row, Table};

use super::popup::Popup;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct StatsTable {
    pub title: String,
    pub rows: Vec<StatsRow>,
}

impl StatsTable {
    pub fn snapshot(widget: &dyn WidgetCapability) -> Self {
        let settings = widget.common_settings();
        let position = settings.position;
        let refreshed_at = widget.refreshed_at().map_or_else(
            || "never".to_string(),
            |at| at.format(TIMESTAMP_FORMAT).to_string(),
        );

        let row = |label: &'static str, value: String| StatsRow { label, value };
        Self {
            title: format!("Settings for {}", settings.module_title()),
            rows: vec![
                row("Type:", settings.module.kind.clone()),
                row("Refresh:", settings.refresh_interval.to_string()),
                row("Refreshed at:", refreshed_at),
                row("Top:", position.top.to_string()),
                row("Left:", position.left.to_string()),
                row("Width:", position.width.to_string()),
                row("Height:", position.height.to_string()),
            ],
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    /// No page-specific bindings.
    pub fn handle_key(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let body = Popup {
            title: &self.title,
            accent: Color::Cyan,
            hints: &[("Esc", "close")],
        }
        .draw(frame, area);

        let rows = self.rows.iter().map(|row| {
            Row::new(vec![
                Cell::from(Line::from(row.label).alignment(Alignment::Right)).style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Cell::from(row.value.as_str()),
            ])
        });
        let table = Table::new(rows, [Constraint::Fill(1), Constraint::Fill(1)]).column_spacing(2);
        frame.render_widget(table, body);
    }
}

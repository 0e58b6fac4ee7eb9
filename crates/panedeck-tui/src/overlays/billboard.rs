//! Scrollable text page, used for widget help.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

use super::popup::Popup;
use crate::keyboard::typed_char;

#[derive(Debug, Clone)]
pub struct BillboardState {
    pub title: String,
    pub text: String,
    pub scroll: u16,
}

impl BillboardState {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            scroll: 0,
        }
    }

    fn max_scroll(&self) -> u16 {
        self.text.lines().count().saturating_sub(1) as u16
    }

    /// Scroll keys. Returns `true` if the key was used.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match (typed_char(key), key.code) {
            (Some('j'), _) | (None, KeyCode::Down) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            (Some('k'), _) | (None, KeyCode::Up) => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            (None, KeyCode::PageDown) => {
                self.scroll = self.scroll.saturating_add(10).min(self.max_scroll());
            }
            (None, KeyCode::PageUp) => {
                self.scroll = self.scroll.saturating_sub(10);
            }
            (Some('g'), _) | (None, KeyCode::Home) => self.scroll = 0,
            _ => return false,
        }
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let body = Popup {
            title: &self.title,
            accent: Color::Green,
            hints: &[("↑↓", "scroll"), ("Esc", "close")],
        }
        .draw(frame, area);

        // First line is the heading.
        let mut lines = self.text.lines();
        let mut text = Text::default();
        if let Some(heading) = lines.next() {
            text.push_line(Line::from(Span::styled(
                heading.to_string(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        for line in lines {
            text.push_line(Line::from(line.to_string()));
        }

        frame.render_widget(Paragraph::new(text).scroll((self.scroll, 0)), body);
    }
}

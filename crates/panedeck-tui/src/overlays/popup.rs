//! Popup chrome shared by every overlay page: a centered bordered box with
//! an optional key-hint footer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{OVERLAY_HEIGHT, OVERLAY_WIDTH};

/// Frame around one overlay page. Hints are `(key, action)` pairs.
pub struct Popup<'a> {
    pub title: &'a str,
    pub accent: Color,
    pub hints: &'a [(&'a str, &'a str)],
}

impl Popup<'_> {
    /// Clears the popup area, draws border, title and hints, and returns the
    /// rect left for the page body.
    pub fn draw(&self, frame: &mut Frame, screen: Rect) -> Rect {
        let area = centered(screen, OVERLAY_WIDTH, OVERLAY_HEIGHT);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent))
            .title(Line::from(format!(" {} ", self.title)).centered())
            .title_style(Style::default().fg(self.accent).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let footer_rows = u16::from(!self.hints.is_empty());
        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(footer_rows)])
                .horizontal_margin(1)
                .areas(inner);

        if footer_rows > 0 {
            frame.render_widget(self.hint_line(), footer);
        }
        body
    }

    fn hint_line(&self) -> Paragraph<'_> {
        let muted = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", muted));
            }
            spans.push(Span::styled(*key, Style::default().fg(self.accent)));
            spans.push(Span::styled(format!(" {action}"), muted));
        }
        Paragraph::new(Line::from(spans).centered())
    }
}

/// A `width` x `height` box centered in `screen`, shrunk to fit when the
/// screen is smaller.
pub fn centered(screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    )
}

/// Dims whatever is already drawn in `area`.
pub fn dim_background(frame: &mut Frame, area: Rect) {
    frame
        .buffer_mut()
        .set_style(area, Style::default().add_modifier(Modifier::DIM));
}

//! Render pass. Pure function of dashboard state; called only by the runtime.

use panedeck_core::PositionSettings;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::dashboard::Dashboard;
use crate::panel::Widget;

pub fn render(dashboard: &Dashboard, frame: &mut Frame) {
    let area = frame.area();
    let widgets = dashboard.widgets();
    let positions: Vec<PositionSettings> = widgets
        .iter()
        .map(|w| w.common_settings().position)
        .collect();
    let rects = grid_rects(area, &positions);

    for (index, (widget, rect)) in widgets.iter().zip(rects).enumerate() {
        if !widget.enabled() || rect.is_empty() {
            continue;
        }
        let focused = dashboard.focused_widget() == Some(index);
        render_widget(frame, rect, widget.as_ref(), focused);
    }

    dashboard.overlays().render(frame);
}

fn render_widget(frame: &mut Frame, area: Rect, widget: &dyn Widget, focused: bool) {
    let border_color = if focused { Color::Yellow } else { Color::Gray };
    let mut title_style = Style::default().fg(border_color);
    if focused {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(widget.border_title())
        .title_style(title_style);

    let paragraph = Paragraph::new(widget.content())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Maps grid positions onto `area`.
///
/// The grid is as wide and tall as the furthest-reaching widget; each cell
/// gets an equal share of the area, with rounding spread across cells.
pub fn grid_rects(area: Rect, positions: &[PositionSettings]) -> Vec<Rect> {
    let columns = positions
        .iter()
        .map(|p| u32::from(p.left) + u32::from(p.width))
        .max()
        .unwrap_or(0)
        .max(1);
    let rows = positions
        .iter()
        .map(|p| u32::from(p.top) + u32::from(p.height))
        .max()
        .unwrap_or(0)
        .max(1);

    let scale = |offset: u32, span: u32, cells: u32| -> u16 { (offset * span / cells) as u16 };
    let width = u32::from(area.width);
    let height = u32::from(area.height);

    positions
        .iter()
        .map(|p| {
            let x0 = scale(u32::from(p.left), width, columns);
            let x1 = scale(u32::from(p.left) + u32::from(p.width), width, columns);
            let y0 = scale(u32::from(p.top), height, rows);
            let y1 = scale(u32::from(p.top) + u32::from(p.height), height, rows);
            Rect::new(area.x + x0, area.y + y0, x1 - x0, y1 - y0)
        })
        .collect()
}

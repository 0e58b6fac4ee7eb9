//! Focus ownership and the global focus bindings.

use crossterm::event::{KeyCode, KeyEvent};

use crate::keyboard::typed_char;
use crate::panel::Widget;

/// The view that currently receives keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// Nothing focused; keys go to the dashboard's global bindings.
    #[default]
    Base,
    /// Widget at this index in the dashboard.
    Widget(usize),
    /// The overlay page with this name.
    Overlay(String),
}

/// Focus cycling and focus-char jumps over the focusable widgets.
#[derive(Debug, Default)]
pub struct FocusTracker {
    /// Indices of focusable, enabled widgets in display order.
    order: Vec<usize>,
    /// (focus char, widget index)
    chars: Vec<(String, usize)>,
}

impl FocusTracker {
    /// Builds the tracker, assigning `1`..`9` to focusable widgets that have
    /// no focus char of their own.
    pub fn new(widgets: &mut [Box<dyn Widget>]) -> Self {
        let order: Vec<usize> = widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.enabled() && w.focusable())
            .map(|(i, _)| i)
            .collect();

        let taken: Vec<String> = widgets
            .iter()
            .map(|w| w.focus_char().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        let mut spare = ('1'..='9')
            .map(String::from)
            .filter(|c| !taken.contains(c));

        let mut chars = Vec::new();
        for &index in &order {
            let widget = &mut widgets[index];
            if widget.focus_char().is_empty() {
                match spare.next() {
                    Some(ch) => widget.set_focus_char(ch),
                    None => continue,
                }
            }
            chars.push((widget.focus_char().to_string(), index));
        }

        Self { order, chars }
    }

    pub fn focusable_count(&self) -> usize {
        self.order.len()
    }

    /// Next focusable widget after `current`, wrapping around.
    pub fn next(&self, current: &FocusTarget) -> FocusTarget {
        self.step(current, true)
    }

    /// Previous focusable widget before `current`, wrapping around.
    pub fn prev(&self, current: &FocusTarget) -> FocusTarget {
        self.step(current, false)
    }

    fn step(&self, current: &FocusTarget, forward: bool) -> FocusTarget {
        let (Some(&first), Some(&last)) = (self.order.first(), self.order.last()) else {
            return FocusTarget::Base;
        };
        let position = match current {
            FocusTarget::Widget(index) => self.order.iter().position(|i| i == index),
            _ => None,
        };
        let index = match (position, forward) {
            (None, true) => first,
            (None, false) => last,
            (Some(p), true) => self.order[(p + 1) % self.order.len()],
            (Some(p), false) => self.order[(p + self.order.len() - 1) % self.order.len()],
        };
        FocusTarget::Widget(index)
    }

    pub fn widget_for_char(&self, ch: char) -> Option<usize> {
        let mut buf = [0u8; 4];
        let ch = &*ch.encode_utf8(&mut buf);
        self.chars
            .iter()
            .find(|(c, _)| c == ch)
            .map(|(_, index)| *index)
    }

    /// Applies the global focus bindings: `Tab`, `BackTab`, `Esc` and focus chars.
    ///
    /// Returns `true` if the key was one of them.
    pub fn handle_key(&self, focus: &mut FocusTarget, event: &KeyEvent) -> bool {
        let next = match event.code {
            KeyCode::Tab => self.next(focus),
            KeyCode::BackTab => self.prev(focus),
            KeyCode::Esc => FocusTarget::Base,
            _ => match typed_char(event).and_then(|c| self.widget_for_char(c)) {
                Some(index) => FocusTarget::Widget(index),
                None => return false,
            },
        };

        if *focus != next {
            tracing::debug!(from = ?focus, to = ?next, "focus changed");
            *focus = next;
        }
        true
    }
}

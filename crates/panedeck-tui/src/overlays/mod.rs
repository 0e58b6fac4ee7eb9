//! Overlay pages drawn above the dashboard.
//!
//! Overlays are modal pages that temporarily take over keyboard input.
//! The [`OverlayManager`] keeps them on an ordered stack; the top page gets
//! input, and closing a page hands focus back to whatever held it when the
//! page opened.
//!
//! ## Module Structure
//!
//! - `billboard.rs`: Scrollable text page (widget help)
//! - `stats.rs`: Settings and refresh timing table for one widget
//! - `popup.rs`: Popup chrome shared by the pages
//!
//! ## Reserved keys
//!
//! While a page is on top, `/`, `?` and `Esc` close it and `Tab` is
//! swallowed so focus cannot move underneath. Everything else goes to the
//! page's own key handler.

pub mod billboard;
pub mod popup;
pub mod stats;

pub use billboard::BillboardState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use panedeck_core::RedrawHandle;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use stats::{StatsRow, StatsTable};

use crate::focus::FocusTarget;
use crate::keyboard::{KeyOutcome, typed_char};

/// Nominal overlay size; shrunk to fit small terminals.
pub const OVERLAY_WIDTH: u16 = 80;
pub const OVERLAY_HEIGHT: u16 = 22;

pub const HELP_OVERLAY: &str = "help";
pub const STATS_OVERLAY: &str = "stats";

// ============================================================================
// Overlay
// ============================================================================

#[derive(Debug)]
pub enum Overlay {
    Billboard(BillboardState),
    Stats(StatsTable),
}

impl Overlay {
    /// Draws the page centered in `area`, which is read fresh every frame.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Billboard(b) => b.render(frame, area),
            Overlay::Stats(s) => s.render(frame, area),
        }
    }

    /// Page-specific keys. Returns `true` if the key was used.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match self {
            Overlay::Billboard(b) => b.handle_key(key),
            Overlay::Stats(s) => s.handle_key(key),
        }
    }
}

// ============================================================================
// OverlayPage / OverlayEntry
// ============================================================================

/// An open request: the page plus how it takes part in input and drawing.
#[derive(Debug)]
pub struct OverlayPage {
    pub name: String,
    pub page: Overlay,
    /// Dims the layers beneath while shown.
    pub modal: bool,
    /// Keys the page does not use are swallowed instead of falling through.
    pub exclusive_input: bool,
}

impl OverlayPage {
    /// A modal page that captures all input.
    pub fn modal(name: impl Into<String>, page: Overlay) -> Self {
        Self {
            name: name.into(),
            page,
            modal: true,
            exclusive_input: true,
        }
    }

    /// A reference page that leaves the dashboard visible and lets keys it
    /// does not use reach the widget that held focus underneath.
    pub fn passive(name: impl Into<String>, page: Overlay) -> Self {
        Self {
            name: name.into(),
            page,
            modal: false,
            exclusive_input: false,
        }
    }
}

#[derive(Debug)]
struct OverlayEntry {
    name: String,
    page: Overlay,
    modal: bool,
    exclusive_input: bool,
    prior_focus: FocusTarget,
}

// ============================================================================
// OverlayManager
// ============================================================================

#[derive(Debug, Default)]
pub struct OverlayManager {
    stack: Vec<OverlayEntry>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a page and moves focus onto it, remembering the previous owner.
    ///
    /// Opening a name that is already open swaps in the new page content and
    /// leaves focus and stacking as they were.
    pub fn open(&mut self, request: OverlayPage, focus: &mut FocusTarget, redraw: &RedrawHandle) {
        if let Some(entry) = self.stack.iter_mut().find(|e| e.name == request.name) {
            tracing::debug!(overlay = %request.name, "overlay already open, replacing page");
            entry.page = request.page;
            redraw.request_redraw();
            return;
        }

        let prior_focus = std::mem::replace(focus, FocusTarget::Overlay(request.name.clone()));
        tracing::debug!(overlay = %request.name, ?prior_focus, "overlay opened");
        self.stack.push(OverlayEntry {
            name: request.name,
            page: request.page,
            modal: request.modal,
            exclusive_input: request.exclusive_input,
            prior_focus,
        });
        redraw.request_redraw();
    }

    /// Closes the named page. A name that is not open is a no-op.
    ///
    /// Returns `true` if a page was removed.
    pub fn close(&mut self, name: &str, focus: &mut FocusTarget, redraw: &RedrawHandle) -> bool {
        let Some(index) = self.stack.iter().position(|e| e.name == name) else {
            return false;
        };
        self.remove(index, focus, redraw);
        true
    }

    /// Closes whatever page is on top. No-op on an empty stack.
    pub fn close_top(&mut self, focus: &mut FocusTarget, redraw: &RedrawHandle) -> bool {
        if self.stack.is_empty() {
            return false;
        }
        self.remove(self.stack.len() - 1, focus, redraw);
        true
    }

    fn remove(&mut self, index: usize, focus: &mut FocusTarget, redraw: &RedrawHandle) {
        let entry = self.stack.remove(index);
        let own = FocusTarget::Overlay(entry.name);

        // A page opened on top of this one must now unwind past it.
        for above in &mut self.stack[index..] {
            if above.prior_focus == own {
                above.prior_focus = entry.prior_focus.clone();
            }
        }

        if *focus == own {
            *focus = entry.prior_focus;
        }
        tracing::debug!(overlay = ?own, restored = ?focus, "overlay closed");
        redraw.request_redraw();
    }

    /// Routes a key to the top page.
    ///
    /// With nothing open every key is ignored.
    pub fn handle_key(
        &mut self,
        event: Option<&KeyEvent>,
        focus: &mut FocusTarget,
        redraw: &RedrawHandle,
    ) -> KeyOutcome {
        let Some(key) = event else {
            return KeyOutcome::Ignored;
        };
        let Some(top) = self.stack.last_mut() else {
            return KeyOutcome::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        if matches!(typed_char(key), Some('/' | '?')) || key.code == KeyCode::Esc {
            self.close_top(focus, redraw);
            return KeyOutcome::Consumed(None);
        }
        if key.code == KeyCode::Tab {
            return KeyOutcome::Consumed(None);
        }

        if top.page.handle_key(key) {
            redraw.request_redraw();
            KeyOutcome::Consumed(None)
        } else if top.exclusive_input {
            KeyOutcome::Consumed(None)
        } else {
            KeyOutcome::Ignored
        }
    }

    /// True when the top page swallows every key.
    pub fn captures_input(&self) -> bool {
        self.stack.last().is_some_and(|e| e.exclusive_input)
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.stack.iter().any(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Name of the top page.
    pub fn top(&self) -> Option<&str> {
        self.stack.last().map(|e| e.name.as_str())
    }

    pub fn page(&self, name: &str) -> Option<&Overlay> {
        self.stack.iter().find(|e| e.name == name).map(|e| &e.page)
    }

    /// Focus owner beneath the whole stack: where focus lands once every
    /// page is closed.
    pub fn base_focus(&self) -> Option<&FocusTarget> {
        self.stack.first().map(|e| &e.prior_focus)
    }

    /// Focus owner recorded when `name` opened.
    pub fn prior_focus(&self, name: &str) -> Option<&FocusTarget> {
        self.stack
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.prior_focus)
    }

    /// Draws the stack bottom to top over the current frame.
    pub fn render(&self, frame: &mut Frame) {
        for entry in &self.stack {
            let area = frame.area();
            if entry.modal {
                popup::dim_background(frame, area);
            }
            entry.page.render(frame, area);
        }
    }
}

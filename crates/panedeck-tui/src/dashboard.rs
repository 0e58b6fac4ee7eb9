//! Dashboard state: the UI owner.
//!
//! Holds every widget, the overlay stack and the focus owner. All keyboard
//! dispatch and all overlay/focus mutation happen here, one event at a time.
//! Background tasks reach the dashboard only through the widget content
//! buffers and the redraw handle.
//!
//! Key routing order:
//! 1. top overlay (reserved keys, then page keys); keys a non-exclusive page
//!    does not use go to the widget focused beneath the stack, and routing
//!    stops there while any page is open
//! 2. focused widget's router
//! 3. global focus bindings (`Tab`, `BackTab`, `Esc`, focus chars)
//! 4. app bindings (`q` / `Ctrl-C` quit, `Ctrl-R` refresh all)

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use panedeck_core::{RedrawHandle, scheduler};
use tokio::task::JoinHandle;

use crate::effects::UiEffect;
use crate::focus::{FocusTarget, FocusTracker};
use crate::keyboard::{KeyOutcome, KeyStroke, typed_char};
use crate::overlays::{
    BillboardState, HELP_OVERLAY, Overlay, OverlayManager, OverlayPage, STATS_OVERLAY, StatsTable,
};
use crate::panel::Widget;

pub struct Dashboard {
    title: String,
    widgets: Vec<Box<dyn Widget>>,
    focus: FocusTarget,
    tracker: FocusTracker,
    overlays: OverlayManager,
    redraw: RedrawHandle,
    should_quit: bool,
}

impl Dashboard {
    pub fn new(title: impl Into<String>, mut widgets: Vec<Box<dyn Widget>>, redraw: RedrawHandle) -> Self {
        let tracker = FocusTracker::new(&mut widgets);
        Self {
            title: title.into(),
            widgets,
            focus: FocusTarget::Base,
            tracker,
            overlays: OverlayManager::new(),
            redraw,
            should_quit: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }

    pub fn focus(&self) -> &FocusTarget {
        &self.focus
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn redraw_handle(&self) -> &RedrawHandle {
        &self.redraw
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Index of the focused widget, if a widget holds focus.
    pub fn focused_widget(&self) -> Option<usize> {
        match self.focus {
            FocusTarget::Widget(index) => Some(index),
            _ => None,
        }
    }

    pub fn request_redraw(&self) {
        self.redraw.request_redraw();
    }

    // ========================================================================
    // Key routing
    // ========================================================================

    /// Routes one key event to completion.
    pub fn handle_key(&mut self, event: Option<&KeyEvent>) -> KeyOutcome {
        let Some(key) = event else {
            return KeyOutcome::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }

        if !self.overlays.is_empty() {
            let outcome = self
                .overlays
                .handle_key(Some(key), &mut self.focus, &self.redraw);
            if outcome.is_consumed() {
                return outcome;
            }
            // Unused by a non-exclusive page: the widget beneath the stack
            // gets it. Focus and app bindings stay off while a page is open.
            return match self.overlays.base_focus().cloned() {
                Some(FocusTarget::Widget(index)) => self.dispatch_to_widget(index, key),
                _ => KeyOutcome::Ignored,
            };
        }

        if let Some(index) = self.focused_widget() {
            let outcome = self.dispatch_to_widget(index, key);
            if outcome.is_consumed() {
                return outcome;
            }
        }

        self.handle_global_key(key)
    }

    fn dispatch_to_widget(&mut self, index: usize, key: &KeyEvent) -> KeyOutcome {
        let Some(widget) = self.widgets.get_mut(index) else {
            return KeyOutcome::Ignored;
        };
        let outcome = widget.handle_key(Some(key));
        if let KeyOutcome::Consumed(effect) = outcome {
            self.redraw.request_redraw();
            if let Some(effect) = effect {
                self.apply_effect(index, effect);
            }
        }
        outcome
    }

    fn handle_global_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        let before = self.focus.clone();
        if self.tracker.handle_key(&mut self.focus, key) {
            if self.focus != before {
                self.redraw.request_redraw();
            }
            return KeyOutcome::Consumed(None);
        }

        let stroke = KeyStroke::from_event(key);
        if typed_char(key) == Some('q') || stroke == KeyStroke::ctrl('c') {
            self.should_quit = true;
            return KeyOutcome::Consumed(Some(UiEffect::Quit));
        }
        if stroke == KeyStroke::ctrl('r') {
            self.refresh_all();
            return KeyOutcome::Consumed(None);
        }
        if key.code == KeyCode::F(1) {
            self.overlays.open(
                OverlayPage::passive(
                    HELP_OVERLAY,
                    Overlay::Billboard(BillboardState::new("Help", global_help_text())),
                ),
                &mut self.focus,
                &self.redraw,
            );
            return KeyOutcome::Consumed(None);
        }

        KeyOutcome::Ignored
    }

    fn apply_effect(&mut self, index: usize, effect: UiEffect) {
        match effect {
            UiEffect::ShowHelp => self.show_help(index),
            UiEffect::ShowStats => self.show_stats(index),
            UiEffect::Quit => self.should_quit = true,
        }
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    /// Opens the keyboard help for the widget at `index`.
    pub fn show_help(&mut self, index: usize) {
        let Some(widget) = self.widgets.get(index) else {
            return;
        };
        let page = BillboardState::new(
            format!("Help: {}", widget.common_settings().display_title()),
            widget.help_text(),
        );
        self.overlays.open(
            OverlayPage::modal(HELP_OVERLAY, Overlay::Billboard(page)),
            &mut self.focus,
            &self.redraw,
        );
    }

    /// Opens the stats table for the widget at `index`.
    pub fn show_stats(&mut self, index: usize) {
        let Some(widget) = self.widgets.get(index) else {
            return;
        };
        let table = StatsTable::snapshot(widget.as_ref());
        self.overlays.open(
            OverlayPage::modal(STATS_OVERLAY, Overlay::Stats(table)),
            &mut self.focus,
            &self.redraw,
        );
    }

    /// Programmatic close. Unknown names are ignored.
    pub fn close_overlay(&mut self, name: &str) -> bool {
        self.overlays.close(name, &mut self.focus, &self.redraw)
    }

    // ========================================================================
    // Refresh and shutdown
    // ========================================================================

    /// Starts a background refresh loop for every enabled, refreshable widget.
    pub fn start_refreshing(&self) -> Vec<JoinHandle<()>> {
        self.widgets
            .iter()
            .filter(|w| w.enabled())
            .filter_map(|w| {
                let refresh = w.refresh_action()?;
                scheduler::schedule(w.name(), w.refresh_interval(), refresh, w.quit_signal())
            })
            .collect()
    }

    pub fn refresh_all(&self) {
        let count = self
            .widgets
            .iter()
            .filter(|w| w.enabled() && w.refresh())
            .count();
        tracing::info!(count, "refreshed all widgets");
    }

    /// Signals every widget's background work to stop. Does not wait.
    pub fn shutdown(&self) {
        for widget in &self.widgets {
            widget.quit_signal().cancel();
        }
        tracing::info!(widgets = self.widgets.len(), "quit signalled to all widgets");
    }
}

fn global_help_text() -> String {
    [
        "Dashboard keys",
        "",
        "  Tab      Focus next widget",
        "  Backtab  Focus previous widget",
        "  Esc      Clear focus",
        "  Ctrl-R   Refresh every widget",
        "  F1       Show these keys",
        "  q        Quit",
        "  Ctrl-C   Quit",
        "",
        "Press a widget's focus key to jump to it, then / for its own keys.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crossterm::event::KeyModifiers;
    use panedeck_core::{ContentBuffer, PositionSettings, RedrawReceiver, Settings, redraw};

    use super::*;
    use crate::panel::{Panel, PanelBase};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ch(c: char) -> KeyEvent {
        press(KeyCode::Char(c))
    }

    fn counting_widget(name: &str, refreshes: &Arc<AtomicUsize>) -> Box<dyn Widget> {
        let counter = Arc::clone(refreshes);
        let settings = Settings::new("example", 30, PositionSettings::default()).with_name(name);
        let base = PanelBase::new(settings, ContentBuffer::new()).with_refresh(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let mut panel = Panel::new(base, 0usize);
        panel.bind_char(
            "l",
            |p: &mut Panel<usize>| {
                p.state += 1;
                None
            },
            "Select next",
        );
        Box::new(panel)
    }

    fn dashboard() -> (Dashboard, RedrawReceiver, Arc<AtomicUsize>) {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let (redraw, rx) = redraw::channel();
        let widgets = vec![
            counting_widget("first", &refreshes),
            counting_widget("second", &refreshes),
        ];
        (Dashboard::new("test", widgets, redraw), rx, refreshes)
    }

    #[test]
    fn test_focus_char_then_widget_binding() {
        let (mut dash, mut rx, refreshes) = dashboard();

        assert!(dash.handle_key(Some(&ch('2'))).is_consumed());
        assert_eq!(dash.focus(), &FocusTarget::Widget(1));
        assert!(rx.take_pending());

        assert_eq!(dash.handle_key(Some(&ch('r'))), KeyOutcome::Consumed(None));
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert!(rx.take_pending());
    }

    #[test]
    fn test_help_overlay_round_trip_restores_widget_focus() {
        let (mut dash, _rx, _) = dashboard();
        dash.handle_key(Some(&ch('1')));

        assert_eq!(
            dash.handle_key(Some(&ch('/'))),
            KeyOutcome::Consumed(Some(UiEffect::ShowHelp))
        );
        assert_eq!(dash.overlays().top(), Some(HELP_OVERLAY));
        assert_eq!(dash.focus(), &FocusTarget::Overlay(HELP_OVERLAY.to_string()));

        dash.handle_key(Some(&ch('/')));
        assert!(dash.overlays().is_empty());
        assert_eq!(dash.focus(), &FocusTarget::Widget(0));
    }

    #[test]
    fn test_stats_overlay_closes_on_escape() {
        let (mut dash, _rx, _) = dashboard();
        dash.handle_key(Some(&ch('1')));
        dash.handle_key(Some(&ch('?')));
        assert_eq!(dash.overlays().top(), Some(STATS_OVERLAY));

        dash.handle_key(Some(&press(KeyCode::Esc)));
        assert!(dash.overlays().is_empty());
        assert_eq!(dash.focus(), &FocusTarget::Widget(0));
    }

    #[test]
    fn test_overlay_blocks_widget_and_focus_keys() {
        let (mut dash, _rx, refreshes) = dashboard();
        dash.handle_key(Some(&ch('1')));
        dash.handle_key(Some(&ch('?')));

        dash.handle_key(Some(&press(KeyCode::Tab)));
        dash.handle_key(Some(&ch('r')));
        dash.handle_key(Some(&ch('2')));

        assert_eq!(dash.focus(), &FocusTarget::Overlay(STATS_OVERLAY.to_string()));
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert!(!dash.should_quit());
    }

    #[test]
    fn test_passive_help_passes_unused_keys_to_widget_beneath() {
        let (mut dash, _rx, refreshes) = dashboard();
        dash.handle_key(Some(&ch('1')));
        dash.handle_key(Some(&press(KeyCode::F(1))));
        assert_eq!(dash.overlays().top(), Some(HELP_OVERLAY));
        assert!(!dash.overlays().captures_input());

        assert_eq!(dash.handle_key(Some(&ch('r'))), KeyOutcome::Consumed(None));
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(dash.focus(), &FocusTarget::Overlay(HELP_OVERLAY.to_string()));

        // Focus chars and app bindings stay off while the page is open.
        assert_eq!(dash.handle_key(Some(&ch('2'))), KeyOutcome::Ignored);
        assert_eq!(dash.handle_key(Some(&ch('q'))), KeyOutcome::Ignored);
        assert_eq!(dash.focus(), &FocusTarget::Overlay(HELP_OVERLAY.to_string()));
        assert_eq!(dash.overlays().top(), Some(HELP_OVERLAY));
        assert!(!dash.should_quit());

        dash.handle_key(Some(&press(KeyCode::Esc)));
        assert!(dash.overlays().is_empty());
        assert_eq!(dash.focus(), &FocusTarget::Widget(0));
    }

    #[test]
    fn test_passive_help_without_focused_widget_ignores_unused_keys() {
        let (mut dash, _rx, refreshes) = dashboard();
        dash.handle_key(Some(&press(KeyCode::F(1))));

        assert_eq!(dash.handle_key(Some(&ch('r'))), KeyOutcome::Ignored);
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(dash.focus(), &FocusTarget::Overlay(HELP_OVERLAY.to_string()));
    }

    #[test]
    fn test_repeat_events_are_ignored() {
        let (mut dash, _rx, refreshes) = dashboard();
        dash.handle_key(Some(&ch('1')));

        let repeat = KeyEvent::new_with_kind(
            KeyCode::Char('r'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        );
        assert_eq!(dash.handle_key(Some(&repeat)), KeyOutcome::Ignored);
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_global_help_lists_every_app_key() {
        let text = global_help_text();
        for key in ["Tab", "Backtab", "Esc", "Ctrl-R", "F1", "q", "Ctrl-C"] {
            assert!(text.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_unfocused_keys_fall_through_to_globals() {
        let (mut dash, _rx, refreshes) = dashboard();

        assert_eq!(dash.handle_key(Some(&ch('r'))), KeyOutcome::Ignored);
        assert_eq!(refreshes.load(Ordering::SeqCst), 0);

        dash.handle_key(Some(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_quit_keys() {
        let (mut dash, _rx, _) = dashboard();
        assert_eq!(
            dash.handle_key(Some(&ch('q'))),
            KeyOutcome::Consumed(Some(UiEffect::Quit))
        );
        assert!(dash.should_quit());

        let (mut dash, _rx, _) = dashboard();
        dash.handle_key(Some(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(dash.should_quit());
    }

    #[test]
    fn test_missing_event_is_noop() {
        let (mut dash, mut rx, _) = dashboard();
        assert_eq!(dash.handle_key(None), KeyOutcome::Ignored);
        assert!(!rx.take_pending());
    }

    #[test]
    fn test_close_overlay_twice_is_noop() {
        let (mut dash, _rx, _) = dashboard();
        dash.show_stats(0);
        assert!(dash.close_overlay(STATS_OVERLAY));
        assert!(!dash.close_overlay(STATS_OVERLAY));
        assert_eq!(dash.focus(), &FocusTarget::Base);
    }

    #[test]
    fn test_show_for_unknown_widget_is_noop() {
        let (mut dash, _rx, _) = dashboard();
        dash.show_help(42);
        dash.show_stats(42);
        assert!(dash.overlays().is_empty());
    }

    #[test]
    fn test_shutdown_cancels_every_quit_signal() {
        let (dash, _rx, _) = dashboard();
        let signals: Vec<_> = dash.widgets().iter().map(|w| w.quit_signal()).collect();

        dash.shutdown();

        assert!(signals.iter().all(tokio_util::sync::CancellationToken::is_cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_refreshing_runs_until_shutdown() {
        let (dash, _rx, refreshes) = dashboard();
        let handles = dash.start_refreshing();
        assert_eq!(handles.len(), 2);

        tokio::time::sleep(std::time::Duration::from_secs(45)).await;
        assert_eq!(refreshes.load(Ordering::SeqCst), 4);

        dash.shutdown();
        for handle in handles {
            handle.await.unwrap();
        }
    }
}

//! Panels: the concrete shape every dashboard widget takes.
//!
//! A [`Panel`] pairs the shared [`PanelBase`] (settings, content buffer,
//! quit signal, refresh action) with widget-specific state and its own
//! [`KeyRouter`]. The dashboard only sees panels as `Box<dyn Widget>`.

use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use panedeck_core::{ContentBuffer, RefreshFn, Settings, WidgetCapability};
use tokio_util::sync::CancellationToken;

use crate::effects::UiEffect;
use crate::keyboard::{KeyOutcome, KeyRouter, KeyStroke};

/// What the dashboard needs from a widget on top of the capability contract.
pub trait Widget: WidgetCapability {
    /// Routes a key to this widget's bindings.
    fn handle_key(&mut self, event: Option<&KeyEvent>) -> KeyOutcome;

    /// Current formatted content, read at draw time.
    fn content(&self) -> String;

    /// The refresh action, if the widget supports refreshing.
    fn refresh_action(&self) -> Option<RefreshFn>;

    fn set_focus_char(&mut self, ch: String);

    /// Runs the refresh action. Returns `false` if the widget has none.
    fn refresh(&self) -> bool {
        match self.refresh_action() {
            Some(refresh) => {
                refresh();
                true
            }
            None => false,
        }
    }
}

/// State shared by every panel regardless of kind.
#[derive(Clone)]
pub struct PanelBase {
    settings: Arc<Settings>,
    content: ContentBuffer,
    quit: CancellationToken,
    refresh: Option<RefreshFn>,
    focus_char: String,
    focusable: bool,
}

impl PanelBase {
    pub fn new(settings: Settings, content: ContentBuffer) -> Self {
        let focus_char = settings.focus_char.clone().unwrap_or_default();
        Self {
            settings: Arc::new(settings),
            content,
            quit: CancellationToken::new(),
            refresh: None,
            focus_char,
            focusable: true,
        }
    }

    #[must_use]
    pub fn with_refresh(mut self, refresh: RefreshFn) -> Self {
        self.refresh = Some(refresh);
        self
    }

    #[must_use]
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn content(&self) -> &ContentBuffer {
        &self.content
    }
}

impl std::fmt::Debug for PanelBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelBase")
            .field("name", &self.settings.module.name)
            .field("refreshable", &self.refresh.is_some())
            .field("focus_char", &self.focus_char)
            .field("focusable", &self.focusable)
            .finish_non_exhaustive()
    }
}

/// A widget: shared base, kind-specific state, key bindings.
#[derive(Debug)]
pub struct Panel<S> {
    base: PanelBase,
    pub state: S,
    keys: KeyRouter<Panel<S>>,
}

impl<S: 'static> Panel<S> {
    /// Creates the panel with the common bindings already installed.
    pub fn new(base: PanelBase, state: S) -> Self {
        let mut panel = Self {
            base,
            state,
            keys: KeyRouter::new(),
        };
        panel.initialize_common_keys();
        panel
    }

    /// `/` help, `r` refresh (only when refreshable), `?` stats.
    ///
    /// Bindings added later on the same keys replace these.
    fn initialize_common_keys(&mut self) {
        self.keys.bind_char(
            "/",
            |_: &mut Self| Some(UiEffect::ShowHelp),
            "Show/hide this help prompt",
        );

        if self.base.refresh.is_some() {
            self.keys.bind_char(
                "r",
                |panel: &mut Self| {
                    panel.refresh();
                    None
                },
                "Refresh widget",
            );
        }

        self.keys.bind_char(
            "?",
            |_: &mut Self| Some(UiEffect::ShowStats),
            "Show settings and stats for this widget",
        );
    }

    pub fn bind_char<F>(&mut self, ch: &str, action: F, help: &str)
    where
        F: Fn(&mut Self) -> Option<UiEffect> + 'static,
    {
        self.keys.bind_char(ch, action, help);
    }

    pub fn bind_key<F>(&mut self, key: impl Into<KeyStroke>, action: F, help: &str)
    where
        F: Fn(&mut Self) -> Option<UiEffect> + 'static,
    {
        self.keys.bind_key(key, action, help);
    }

    pub fn base(&self) -> &PanelBase {
        &self.base
    }

    pub fn keys(&self) -> &KeyRouter<Self> {
        &self.keys
    }
}

impl<S: 'static> WidgetCapability for Panel<S> {
    fn name(&self) -> &str {
        &self.base.settings.module.name
    }

    fn common_settings(&self) -> &Settings {
        &self.base.settings
    }

    fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.base.content.refreshed_at()
    }

    fn focus_char(&self) -> &str {
        &self.base.focus_char
    }

    fn focusable(&self) -> bool {
        self.base.focusable
    }

    fn help_text(&self) -> String {
        self.keys.help_text(&self.base.settings.module_title())
    }

    fn quit_signal(&self) -> CancellationToken {
        self.base.quit.clone()
    }
}

impl<S: 'static> Widget for Panel<S> {
    fn handle_key(&mut self, event: Option<&KeyEvent>) -> KeyOutcome {
        // Clone the action out so it can borrow the whole panel mutably.
        let Some(action) = self.keys.resolve(event) else {
            return KeyOutcome::Ignored;
        };
        KeyOutcome::Consumed(action(self))
    }

    fn content(&self) -> String {
        self.base.content.text()
    }

    fn refresh_action(&self) -> Option<RefreshFn> {
        self.base.refresh.clone()
    }

    fn set_focus_char(&mut self, ch: String) {
        self.base.focus_char = ch;
    }
}

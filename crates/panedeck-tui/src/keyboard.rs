//! Per-widget keyboard routing.
//!
//! A [`KeyRouter`] holds two tables: single-character bindings and named-key
//! bindings (arrows, function keys, Ctrl chords). Dispatch tries the character
//! table first and falls back to the named table, so one keypress fires at
//! most one action.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::UiEffect;

/// A bound action. Returns an optional effect for the dashboard to apply.
pub type KeyAction<W> = Rc<dyn Fn(&mut W) -> Option<UiEffect>>;

/// Verdict for one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// An action ran. The event must not be routed any further.
    Consumed(Option<UiEffect>),
    /// Nothing matched. Pass the event to the next handler.
    Ignored,
}

impl KeyOutcome {
    pub fn is_consumed(self) -> bool {
        matches!(self, KeyOutcome::Consumed(_))
    }
}

/// A named key plus its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyStroke {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Ctrl + a letter, e.g. `KeyStroke::ctrl('d')`.
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        let mut modifiers = event.modifiers;
        // Terminals report BackTab with SHIFT set; the code already says it.
        if event.code == KeyCode::BackTab {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self {
            code: event.code,
            modifiers,
        }
    }
}

impl From<KeyCode> for KeyStroke {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::BackTab => f.write_str("Backtab"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Insert => f.write_str("Insert"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PgUp"),
            KeyCode::PageDown => f.write_str("PgDn"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// The character a plain keypress types, if any.
///
/// Ctrl and Alt chords are named keys, not characters.
pub(crate) fn typed_char(event: &KeyEvent) -> Option<char> {
    match event.code {
        KeyCode::Char(c)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct HelpItem {
    key: String,
    text: String,
}

/// Keyed-action tables for one widget.
pub struct KeyRouter<W> {
    char_map: HashMap<String, KeyAction<W>>,
    key_map: HashMap<KeyStroke, KeyAction<W>>,
    char_help: Vec<HelpItem>,
    key_help: Vec<HelpItem>,
}

impl<W> Default for KeyRouter<W> {
    fn default() -> Self {
        Self {
            char_map: HashMap::new(),
            key_map: HashMap::new(),
            char_help: Vec::new(),
            key_help: Vec::new(),
        }
    }
}

impl<W> fmt::Debug for KeyRouter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRouter")
            .field("chars", &self.char_help.iter().map(|h| &h.key).collect::<Vec<_>>())
            .field("keys", &self.key_help.iter().map(|h| &h.key).collect::<Vec<_>>())
            .finish()
    }
}

impl<W> KeyRouter<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a character. An empty `ch` is ignored so nothing becomes a
    /// catch-all; binding the same character again replaces the action.
    pub fn bind_char<F>(&mut self, ch: &str, action: F, help: &str)
    where
        F: Fn(&mut W) -> Option<UiEffect> + 'static,
    {
        if ch.is_empty() {
            return;
        }

        self.char_map.insert(ch.to_string(), Rc::new(action));
        upsert_help(&mut self.char_help, ch.to_string(), help);
    }

    /// Binds a named key. Binding the same stroke again replaces the action.
    pub fn bind_key<F>(&mut self, key: impl Into<KeyStroke>, action: F, help: &str)
    where
        F: Fn(&mut W) -> Option<UiEffect> + 'static,
    {
        let key = key.into();
        self.key_map.insert(key, Rc::new(action));
        upsert_help(&mut self.key_help, key.to_string(), help);
    }

    /// Finds the action bound to `event`, character table first.
    ///
    /// Missing events, repeats and releases resolve to nothing.
    pub fn resolve(&self, event: Option<&KeyEvent>) -> Option<KeyAction<W>> {
        let event = event?;
        if event.kind != KeyEventKind::Press {
            return None;
        }

        if let Some(ch) = typed_char(event) {
            let mut buf = [0u8; 4];
            if let Some(action) = self.char_map.get(&*ch.encode_utf8(&mut buf)) {
                return Some(Rc::clone(action));
            }
        }

        self.key_map
            .get(&KeyStroke::from_event(event))
            .map(Rc::clone)
    }

    /// Resolves `event` and runs the action on `target`.
    pub fn dispatch(&self, target: &mut W, event: Option<&KeyEvent>) -> KeyOutcome {
        match self.resolve(event) {
            Some(action) => KeyOutcome::Consumed(action(target)),
            None => KeyOutcome::Ignored,
        }
    }

    /// Number of bound keys across both tables.
    pub fn len(&self) -> usize {
        self.char_map.len() + self.key_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the bindings as aligned help text, character bindings first.
    pub fn help_text(&self, module_title: &str) -> String {
        let mut out = format!("Keyboard commands for {module_title}\n");

        for section in [&self.char_help, &self.key_help] {
            if section.is_empty() {
                continue;
            }
            out.push('\n');
            let width = section
                .iter()
                .map(|item| item.key.chars().count())
                .max()
                .unwrap_or(0);
            for item in section {
                out.push_str(&format!("  {:<width$}  {}\n", item.key, item.text));
            }
        }

        out
    }
}

fn upsert_help(items: &mut Vec<HelpItem>, key: String, text: &str) {
    match items.iter_mut().find(|item| item.key == key) {
        Some(item) => item.text = text.to_string(),
        None => items.push(HelpItem {
            key,
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    fn record(name: &'static str) -> impl Fn(&mut Recorder) -> Option<UiEffect> {
        move |r: &mut Recorder| {
            r.calls.push(name);
            None
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_dispatch_invokes_bound_char() {
        let mut router = KeyRouter::new();
        router.bind_char("h", record("prev"), "Select previous");
        router.bind_char("l", record("next"), "Select next");

        let mut target = Recorder::default();
        let outcome = router.dispatch(&mut target, Some(&press(KeyCode::Char('l'))));

        assert_eq!(outcome, KeyOutcome::Consumed(None));
        assert_eq!(target.calls, vec!["next"]);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut router = KeyRouter::new();
        router.bind_char("h", record("prev"), "Select previous");

        let mut target = Recorder::default();
        assert_eq!(
            router.dispatch(&mut target, Some(&press(KeyCode::Char('x')))),
            KeyOutcome::Ignored
        );
        assert_eq!(
            router.dispatch(&mut target, Some(&press(KeyCode::Left))),
            KeyOutcome::Ignored
        );
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_missing_event_is_ignored() {
        let mut router = KeyRouter::new();
        router.bind_char("h", record("prev"), "Select previous");

        let mut target = Recorder::default();
        assert_eq!(router.dispatch(&mut target, None), KeyOutcome::Ignored);
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_empty_char_binding_is_noop() {
        let mut router: KeyRouter<Recorder> = KeyRouter::new();
        router.bind_char("", record("catch-all"), "Nope");

        assert_eq!(router.len(), 0);
        assert!(!router.help_text("Test").contains("Nope"));
    }

    #[test]
    fn test_rebinding_keeps_latest_action() {
        let mut router = KeyRouter::new();
        router.bind_char("r", record("first"), "First");
        router.bind_char("r", record("second"), "Second");

        let mut target = Recorder::default();
        router.dispatch(&mut target, Some(&press(KeyCode::Char('r'))));

        assert_eq!(target.calls, vec!["second"]);
        assert_eq!(router.len(), 1);
        let help = router.help_text("Test");
        assert!(help.contains("Second"));
        assert!(!help.contains("First"));
    }

    #[test]
    fn test_char_binding_wins_without_double_fire() {
        let mut router = KeyRouter::new();
        router.bind_char("x", record("char"), "Char");
        router.bind_key(KeyCode::Char('x'), record("named"), "Named");

        let mut target = Recorder::default();
        router.dispatch(&mut target, Some(&press(KeyCode::Char('x'))));

        assert_eq!(target.calls, vec!["char"]);
    }

    #[test]
    fn test_named_keys_and_ctrl_chords() {
        let mut router = KeyRouter::new();
        router.bind_char("d", record("plain-d"), "Plain");
        router.bind_key(KeyCode::Right, record("right"), "Right");
        router.bind_key(KeyStroke::ctrl('d'), record("ctrl-d"), "Ctrl");

        let mut target = Recorder::default();
        router.dispatch(&mut target, Some(&press(KeyCode::Right)));
        router.dispatch(
            &mut target,
            Some(&KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
        );

        assert_eq!(target.calls, vec!["right", "ctrl-d"]);
    }

    #[test]
    fn test_backtab_matches_regardless_of_shift() {
        let mut router = KeyRouter::new();
        router.bind_key(KeyCode::BackTab, record("back"), "Back");

        let mut target = Recorder::default();
        router.dispatch(
            &mut target,
            Some(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        );

        assert_eq!(target.calls, vec!["back"]);
    }

    #[test]
    fn test_key_release_and_repeat_are_ignored() {
        let mut router = KeyRouter::new();
        router.bind_char("h", record("prev"), "Select previous");
        router.bind_key(KeyCode::Left, record("left"), "Select previous");

        let mut target = Recorder::default();
        for kind in [KeyEventKind::Release, KeyEventKind::Repeat] {
            for code in [KeyCode::Char('h'), KeyCode::Left] {
                let event = KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind);
                assert_eq!(router.dispatch(&mut target, Some(&event)), KeyOutcome::Ignored);
            }
        }
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_action_effect_is_returned() {
        let mut router: KeyRouter<Recorder> = KeyRouter::new();
        router.bind_char("?", |_| Some(UiEffect::ShowStats), "Stats");

        let mut target = Recorder::default();
        assert_eq!(
            router.dispatch(&mut target, Some(&press(KeyCode::Char('?')))),
            KeyOutcome::Consumed(Some(UiEffect::ShowStats))
        );
    }

    #[test]
    fn test_help_text_order_and_alignment() {
        let mut router = KeyRouter::new();
        router.bind_char("h", record("prev"), "Select previous");
        router.bind_char("l", record("next"), "Select next");
        router.bind_key(KeyCode::Left, record("prev"), "Select previous");
        router.bind_key(KeyStroke::ctrl('d'), record("del"), "Delete");

        let help = router.help_text("Gitlab");
        let lines: Vec<&str> = help.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Keyboard commands for Gitlab",
                "",
                "  h  Select previous",
                "  l  Select next",
                "",
                "  Left    Select previous",
                "  Ctrl-D  Delete",
            ]
        );
    }

    #[test]
    fn test_key_names() {
        assert_eq!(KeyStroke::new(KeyCode::PageDown).to_string(), "PgDn");
        assert_eq!(KeyStroke::new(KeyCode::F(5)).to_string(), "F5");
        assert_eq!(KeyStroke::ctrl('r').to_string(), "Ctrl-R");
        assert_eq!(KeyStroke::new(KeyCode::Esc).to_string(), "Esc");
    }
}

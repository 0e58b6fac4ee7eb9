//! Per-widget settings shared by the widget, the layout and the stats overlay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity of the module that backs a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSettings {
    /// Module type name (e.g. "clock").
    #[serde(rename = "type")]
    pub kind: String,
    /// Instance name, unique within one dashboard.
    pub name: String,
}

/// Grid placement, in layout cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSettings {
    pub top: u16,
    pub left: u16,
    pub width: u16,
    pub height: u16,
}

/// Settings every widget carries. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub module: ModuleSettings,
    pub title: Option<String>,
    /// Seconds between background refreshes. Zero refreshes once.
    pub refresh_interval: u64,
    pub focus_char: Option<String>,
    pub enabled: bool,
    pub position: PositionSettings,
}

impl Settings {
    pub fn new(kind: impl Into<String>, refresh_interval: u64, position: PositionSettings) -> Self {
        let kind = kind.into();
        Self {
            module: ModuleSettings {
                name: kind.clone(),
                kind,
            },
            title: None,
            refresh_interval,
            focus_char: None,
            enabled: true,
            position,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.module.name = name.into();
        self
    }

    #[must_use]
    pub fn with_focus_char(mut self, ch: impl Into<String>) -> Self {
        self.focus_char = Some(ch.into());
        self
    }

    /// Title shown in the widget border; falls back to the instance name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.module.name)
    }

    /// Module type with the first letter of each word upper-cased.
    pub fn module_title(&self) -> String {
        title_case(&self.module.kind)
    }

    pub fn refresh_every(&self) -> Option<Duration> {
        (self.refresh_interval > 0).then(|| Duration::from_secs(self.refresh_interval))
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_title_capitalizes_words() {
        let settings = Settings::new("gitlab todo", 30, PositionSettings::default());
        assert_eq!(settings.module_title(), "Gitlab Todo");
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        let mut settings = Settings::new("clock", 1, PositionSettings::default()).with_name("utc");
        assert_eq!(settings.display_title(), "utc");

        settings.title = Some("World Clock".to_string());
        assert_eq!(settings.display_title(), "World Clock");
    }

    #[test]
    fn test_zero_interval_never_repeats() {
        let settings = Settings::new("clock", 0, PositionSettings::default());
        assert_eq!(settings.refresh_every(), None);

        let settings = Settings::new("clock", 5, PositionSettings::default());
        assert_eq!(settings.refresh_every(), Some(Duration::from_secs(5)));
    }
}

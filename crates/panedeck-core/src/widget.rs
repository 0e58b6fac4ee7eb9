//! The capability contract every panel satisfies.
//!
//! The router, the overlays and the scheduler only ever see widgets through
//! `&dyn WidgetCapability`, so new widget kinds plug in without touching them.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio_util::sync::CancellationToken;

use crate::settings::Settings;

pub trait WidgetCapability {
    /// Instance name, unique within one dashboard.
    fn name(&self) -> &str;

    fn common_settings(&self) -> &Settings;

    /// Last time new content landed, `None` before the first refresh.
    fn refreshed_at(&self) -> Option<DateTime<Local>>;

    /// Key that jumps focus to this widget. Empty when none is assigned.
    fn focus_char(&self) -> &str;

    fn focusable(&self) -> bool;

    /// Keyboard help for this widget.
    fn help_text(&self) -> String;

    /// Cancelled on shutdown; background refresh tasks stop when it fires.
    fn quit_signal(&self) -> CancellationToken;

    fn enabled(&self) -> bool {
        self.common_settings().enabled
    }

    fn refresh_interval(&self) -> Option<Duration> {
        self.common_settings().refresh_every()
    }

    /// Border title: display title plus the focus key hint, if any.
    fn border_title(&self) -> String {
        let title = self.common_settings().display_title();
        match self.focus_char() {
            "" => format!(" {title} "),
            ch => format!(" {title} [{ch}] "),
        }
    }
}

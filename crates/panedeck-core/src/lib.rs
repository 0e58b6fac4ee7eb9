//! UI-free core for the panedeck dashboard.
//!
//! Everything here is safe to touch from background refresh tasks except
//! where noted: the capability contract, per-widget settings, the shared
//! content buffer, the redraw synchronizer and the refresh scheduler.
//! Configuration loading and logging setup live here too so the binary stays thin.

pub mod config;
pub mod content;
pub mod logging;
pub mod redraw;
pub mod scheduler;
pub mod settings;
pub mod widget;

pub use content::ContentBuffer;
pub use redraw::{RedrawHandle, RedrawReceiver};
pub use scheduler::RefreshFn;
pub use settings::{ModuleSettings, PositionSettings, Settings};
pub use widget::WidgetCapability;

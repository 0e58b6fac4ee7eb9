//! Terminal UI for the panedeck dashboard.
//!
//! Elm-style split:
//! - `dashboard`: state plus key routing (the only mutator of focus and overlays)
//! - `render`: pure draw of dashboard state
//! - `runtime`: terminal ownership, event loop, the single redraw consumer

pub mod dashboard;
pub mod effects;
pub mod focus;
pub mod keyboard;
pub mod overlays;
pub mod panel;
pub mod render;
pub mod runtime;
pub mod terminal;

pub use dashboard::Dashboard;
pub use effects::UiEffect;
pub use focus::FocusTarget;
pub use keyboard::{KeyOutcome, KeyRouter, KeyStroke};
pub use panel::{Panel, PanelBase, Widget};
pub use runtime::DashboardRuntime;

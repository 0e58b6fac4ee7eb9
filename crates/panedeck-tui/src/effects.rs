//! UI effect types.
//!
//! Key actions never reach into the dashboard directly. They mutate their own
//! widget and return at most one effect, which the dashboard applies before
//! the next event is read.

/// Effects a key action can ask the dashboard to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEffect {
    /// Open the help overlay for the widget that produced the effect.
    ShowHelp,
    /// Open the stats overlay for the widget that produced the effect.
    ShowStats,
    /// Leave the dashboard.
    Quit,
}

//! Background refresh scheduling.
//!
//! Each widget with a refresh action gets one tokio task that calls it on the
//! widget's interval until the widget's quit signal fires. Must be called from
//! inside a tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Zero-argument refresh action supplied by a widget.
///
/// Implementations start the fetch and return; they call
/// `RedrawHandle::request_redraw` once new content is stored.
pub type RefreshFn = Arc<dyn Fn() + Send + Sync>;

/// Runs `refresh` now and then every `every` until `quit` is cancelled.
///
/// With no interval the action runs once and no task is spawned.
pub fn schedule(
    name: &str,
    every: Option<Duration>,
    refresh: RefreshFn,
    quit: CancellationToken,
) -> Option<JoinHandle<()>> {
    let Some(every) = every else {
        tracing::debug!(widget = name, "refreshing once, no interval configured");
        refresh();
        return None;
    };

    tracing::debug!(widget = name, ?every, "scheduling background refresh");
    let name = name.to_string();
    Some(tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                () = quit.cancelled() => {
                    tracing::debug!(widget = %name, "refresh loop stopped");
                    break;
                }
                _ = ticker.tick() => refresh(),
            }
        }
    }))
}

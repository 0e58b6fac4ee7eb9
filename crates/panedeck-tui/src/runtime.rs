//! Dashboard runtime: owns the terminal and is the only place draws happen.
//!
//! The loop alternates between two sources:
//! - the redraw receiver, drained without blocking; any pending requests
//!   collapse into one draw
//! - terminal input, polled with a short timeout so redraw requests from
//!   background refreshes are picked up promptly
//!
//! Keys are routed synchronously on this thread, so no two key events are
//! ever processed concurrently.

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use panedeck_core::RedrawReceiver;
use tokio::task::JoinHandle;

use crate::dashboard::Dashboard;
use crate::terminal::{self, DashboardTerminal};
use crate::render;

/// Poll timeout right after input, so key-driven redraws land within a frame.
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll timeout when idle. Bounds the latency of background redraw requests.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

pub struct DashboardRuntime {
    terminal: DashboardTerminal,
    dashboard: Dashboard,
    redraw_rx: RedrawReceiver,
    refresh_tasks: Vec<JoinHandle<()>>,
    last_terminal_event: std::time::Instant,
}

impl DashboardRuntime {
    /// Puts the terminal into TUI mode.
    ///
    /// Must be called inside a tokio runtime context; `run` spawns the
    /// refresh tasks onto it.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(dashboard: Dashboard, redraw_rx: RedrawReceiver) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let _ = terminal::set_title(dashboard.title());

        Ok(Self {
            terminal,
            dashboard,
            redraw_rx,
            refresh_tasks: Vec::new(),
            last_terminal_event: std::time::Instant::now(),
        })
    }

    /// Runs until the user quits, then signals every widget to stop.
    ///
    /// # Errors
    /// Returns an error if reading input or drawing fails.
    pub fn run(&mut self) -> Result<()> {
        self.refresh_tasks = self.dashboard.start_refreshing();
        tracing::info!(
            widgets = self.dashboard.widgets().len(),
            tasks = self.refresh_tasks.len(),
            "dashboard started"
        );

        self.dashboard.request_redraw();
        let result = self.event_loop();

        self.dashboard.shutdown();
        for task in self.refresh_tasks.drain(..) {
            if !task.is_finished() {
                task.abort();
            }
        }
        tracing::info!("dashboard stopped");
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.dashboard.should_quit() {
            if self.redraw_rx.take_pending() {
                let dashboard = &self.dashboard;
                self.terminal.draw(|frame| render::render(dashboard, frame))?;
            }

            let poll_duration = if self.last_terminal_event.elapsed() < IDLE_POLL_DURATION {
                FRAME_DURATION
            } else {
                IDLE_POLL_DURATION
            };

            if event::poll(poll_duration)? {
                self.last_terminal_event = std::time::Instant::now();
                self.handle_event(event::read()?);
                while event::poll(std::time::Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                let outcome = self.dashboard.handle_key(Some(&key));
                tracing::trace!(?key, ?outcome, "key routed");
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.dashboard.request_redraw();
            }
            _ => {}
        }
    }
}

impl Drop for DashboardRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

//! Displayed-content buffer shared between a widget's background refresh
//! and the UI owner.
//!
//! Background tasks write through [`ContentBuffer::store`]; the UI owner
//! reads a snapshot at draw time. Nothing else is shared across contexts.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Local};

#[derive(Debug, Default)]
struct Inner {
    text: String,
    refreshed_at: Option<DateTime<Local>>,
}

/// Cloneable handle to one widget's formatted content.
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    inner: Arc<RwLock<Inner>>,
}

impl ContentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the text and stamps the refresh time in one write.
    pub fn store(&self, text: impl Into<String>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.text = text.into();
        inner.refreshed_at = Some(Local::now());
    }

    pub fn text(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .text
            .clone()
    }

    /// Time of the last [`store`](Self::store), `None` before the first refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .refreshed_at
    }
}

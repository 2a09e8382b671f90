//! User-facing notifications
//!
//! A notification sink is a single-slot text display: each `show` replaces
//! whatever message was there before.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A message as last shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    /// Render with preserved line breaks (left-aligned list) instead of a single line
    pub multiline: bool,
}

/// Trait for notification displays
pub trait NotificationSink: Send + Sync {
    /// Display `message`, overwriting any previous one
    fn show(&self, message: &str, multiline: bool);
}

/// In-memory banner slot
///
/// Keeps the latest notice and how many notices have been shown so callers
/// (the HTTP API, tests) can read it back.
#[derive(Debug, Default)]
pub struct BannerSlot {
    inner: Mutex<BannerState>,
}

#[derive(Debug, Default)]
struct BannerState {
    current: Option<Notice>,
    shown: usize,
}

impl BannerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notice currently displayed, if any
    pub fn current(&self) -> Option<Notice> {
        self.lock().current.clone()
    }

    /// Total number of `show` calls
    pub fn shown(&self) -> usize {
        self.lock().shown
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BannerState> {
        // A panic while holding the lock cannot leave the slot half-written
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NotificationSink for BannerSlot {
    fn show(&self, message: &str, multiline: bool) {
        let mut state = self.lock();
        state.current = Some(Notice {
            message: message.to_string(),
            multiline,
        });
        state.shown += 1;
    }
}

/// Prints notices to stderr (CLI)
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn show(&self, message: &str, _multiline: bool) {
        eprintln!("{}", message);
    }
}

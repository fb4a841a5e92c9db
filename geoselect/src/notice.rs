//! User-visible notices.
//!
//! Two kinds exist: transient hints that expire on their own after
//! [`TRANSIENT_NOTICE_TTL`] (lookup failures, unresolvable clicks), and
//! blocking notices that stay until dismissed (failed saves, missing
//! configuration). Only the most recent notice is shown.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::info;

/// How long a transient notice stays visible.
pub const TRANSIENT_NOTICE_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    /// Auto-dismissing hint.
    Transient,
    /// Stays until dismissed.
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: NoticeSeverity,
    expires_at: Option<Instant>,
}

impl Notice {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Shared slot holding the current notice.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    current: Arc<Mutex<Option<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a hint that expires after [`TRANSIENT_NOTICE_TTL`].
    pub fn post_transient(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message, "Transient notice");
        *self.current.lock() = Some(Notice {
            message,
            severity: NoticeSeverity::Transient,
            expires_at: Some(Instant::now() + TRANSIENT_NOTICE_TTL),
        });
    }

    /// Show a notice that stays until [`dismiss`](Self::dismiss) is called.
    pub fn post_blocking(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message, "Blocking notice");
        *self.current.lock() = Some(Notice {
            message,
            severity: NoticeSeverity::Blocking,
            expires_at: None,
        });
    }

    /// The visible notice, if any. Expired transient notices are dropped here.
    pub fn current(&self) -> Option<Notice> {
        let mut slot = self.current.lock();
        if slot.as_ref().is_some_and(|n| n.is_expired(Instant::now())) {
            *slot = None;
        }
        slot.clone()
    }

    pub fn dismiss(&self) {
        *self.current.lock() = None;
    }
}

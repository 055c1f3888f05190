//! Notifications
//!
//! Cart operations emit transient, user-visible notices (the storefront
//! renders them as toasts). The store remains the single source of truth
//! for when a notice is warranted; notifiers passively receive them for
//! rendering or recording.

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation of a completed action.
    Success,
    /// A recoverable failure the user should see.
    Error,
}

/// A transient, user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// How the notice should be styled.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Notice {
    /// Create a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Create an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Sink for notices emitted by cart operations.
pub trait Notifier {
    /// Receive a notice.
    fn notify(&mut self, notice: Notice);
}

/// No-op notifier for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _: Notice) {}
}

/// Notifier that records every notice in memory, in order.
///
/// Used by tests and debug panels to assert on the user-visible output of
/// a sequence of cart operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingNotifier {
    notices: Vec<Notice>,
}

impl RecordingNotifier {
    /// All notices received so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The most recent notice, if any.
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Drop all recorded notices.
    pub fn clear(&mut self) {
        self.notices.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

//! In-memory audit trail recorder.

use parking_lot::Mutex;

use super::AuditEvent;

/// In-memory recorder for audit events.
///
/// Shared across request threads; events keep the order they were recorded in.
///
/// # Example
///
/// ```
/// use blog_policy::audit::{AuditEvent, AuditOutcome, AuditTrail};
/// use blog_policy::Action;
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new("req-1", None, Action::Browse, AuditOutcome::Allowed));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// An empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event`.
    pub fn record(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }

    /// Copies out every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// `true` until the first event arrives.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drops every recorded event.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

//! Audit trail of gate decisions.
//!
//! - `AuditEvent`: what was attempted, by whom, and the verdict
//! - `AuditTrail`: in-memory recorder
//! - [`emit`]: writes an event to the `blog_audit` tracing target
//!
//! Events carry identifiers only; submitted content never enters the trail.

mod event;
mod trail;

pub use event::{AuditEvent, AuditOutcome};
pub use trail::AuditTrail;

/// Emits an audit event as a structured tracing event, and records it to
/// `trail` when one is given.
pub fn emit(event: AuditEvent, trail: Option<&AuditTrail>) {
    tracing::info!(
        target: "blog_audit",
        request_id = %event.request_id(),
        user = ?event.user(),
        action = %event.action(),
        outcome = %event.outcome(),
        resource = ?event.resource(),
        "audit event"
    );
    if let Some(trail) = trail {
        trail.record(event);
    }
}

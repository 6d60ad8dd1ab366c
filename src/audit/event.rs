//! Audit event schema.

use std::fmt;

use crate::gate::{DenyReason, Verdict};
use crate::policy::Action;
use crate::request::UserId;

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The gate allowed the action
    Allowed,
    /// The gate denied the action
    Denied(DenyReason),
    /// The action was allowed but storage refused it
    Failed,
}

impl From<Verdict> for AuditOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Allow => AuditOutcome::Allowed,
            Verdict::Deny(reason) => AuditOutcome::Denied(reason),
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Allowed => write!(f, "allowed"),
            AuditOutcome::Denied(reason) => write!(f, "denied ({})", reason),
            AuditOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// A gate decision, recorded without any submitted content.
///
/// Only identifiers are stored: no post bodies, no comment text.
///
/// # Example
///
/// ```
/// use blog_policy::audit::{AuditEvent, AuditOutcome};
/// use blog_policy::{Action, UserId};
///
/// let event = AuditEvent::new("req-123", Some(UserId(1)), Action::DeletePost, AuditOutcome::Allowed)
///     .with_resource("post:7");
///
/// assert_eq!(event.request_id(), "req-123");
/// assert_eq!(event.resource(), Some("post:7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    user: Option<UserId>,
    action: Action,
    outcome: AuditOutcome,
    resource: Option<String>,
}

impl AuditEvent {
    /// Creates a new audit event.
    pub fn new(
        request_id: impl Into<String>,
        user: Option<UserId>,
        action: Action,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            user,
            action,
            outcome,
            resource: None,
        }
    }

    /// Sets the affected resource, e.g. `post:7`.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the acting user, if any.
    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Returns the attempted action.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the affected resource, if set.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[action={}, outcome={}, request_id={}, user=",
            self.action, self.outcome, self.request_id
        )?;
        match self.user {
            Some(user) => write!(f, "{}", user)?,
            None => write!(f, "<anonymous>")?,
        }
        if let Some(resource) = &self.resource {
            write!(f, ", resource={}", resource)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_verdict() {
        assert_eq!(AuditOutcome::from(Verdict::Allow), AuditOutcome::Allowed);
        assert_eq!(
            AuditOutcome::from(Verdict::Deny(DenyReason::AdministratorOnly)),
            AuditOutcome::Denied(DenyReason::AdministratorOnly)
        );
    }

    #[test]
    fn outcome_display() {
        assert_eq!(AuditOutcome::Allowed.to_string(), "allowed");
        assert_eq!(
            AuditOutcome::Denied(DenyReason::AuthenticationRequired).to_string(),
            "denied (authentication required)"
        );
    }

    #[test]
    fn display_marks_anonymous() {
        let event = AuditEvent::new(
            "req-anon",
            None,
            Action::CommentOnPost,
            AuditOutcome::Denied(DenyReason::AuthenticationRequired),
        );
        let display = event.to_string();
        assert!(display.contains("<anonymous>"));
        assert!(display.contains("comment_on_post"));
    }

    #[test]
    fn display_includes_resource() {
        let event = AuditEvent::new("req-1", Some(UserId(1)), Action::EditPost, AuditOutcome::Allowed)
            .with_resource("post:3");
        assert_eq!(
            event.to_string(),
            "AuditEvent[action=edit_post, outcome=allowed, request_id=req-1, user=1, resource=post:3]"
        );
    }
}

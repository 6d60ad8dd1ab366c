use std::fmt;

use crate::{
    capability::Permit,
    error::{Violation, ViolationKind},
    policy::{Action, PolicyReq},
    request::{Principal, UserId, ADMIN_ID},
};

/// Why the gate refused an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The principal must sign in first
    AuthenticationRequired,
    /// Only the administrator may perform the action
    AdministratorOnly,
}

impl DenyReason {
    /// The user-facing reason string.
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::AuthenticationRequired => "authentication required",
            DenyReason::AdministratorOnly => "administrator only",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The action may proceed
    Allow,
    /// The action is refused
    Deny(DenyReason),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Allow`].
    pub fn is_allow(self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// The deny reason, if any.
    pub fn reason(self) -> Option<DenyReason> {
        match self {
            Verdict::Allow => None,
            Verdict::Deny(reason) => Some(reason),
        }
    }
}

/// Decides whether `principal` may perform `action`, with the administrator
/// fixed at identity `1`.
///
/// Rules, first match wins:
/// 1. every action but [`Action::Browse`] needs an authenticated principal
/// 2. post creation, editing and deletion need the administrator
/// 3. anything else is allowed, including any signed-in user deleting any comment
///
/// # Examples
///
/// ```
/// use blog_policy::{authorize, Action, DenyReason, Principal, UserId, Verdict};
///
/// assert_eq!(
///     authorize(&Principal::anonymous(), Action::CreatePost),
///     Verdict::Deny(DenyReason::AuthenticationRequired),
/// );
/// assert_eq!(authorize(&Principal::user(UserId(1)), Action::DeletePost), Verdict::Allow);
/// ```
pub fn authorize(principal: &Principal, action: Action) -> Verdict {
    PolicyGate::default().authorize(principal, action)
}

/// The authorization gate.
///
/// `PolicyGate` is the only way to obtain a [`Permit`]. It holds the
/// administrator identity and nothing else, so one instance can be shared
/// by every request thread.
///
/// # Examples
///
/// ```
/// use blog_policy::{Action, PolicyGate, Principal, UserId};
///
/// let gate = PolicyGate::default();
///
/// let permit = gate
///     .permit(&Principal::user(UserId(1)), Action::CreatePost)
///     .expect("administrator may publish");
/// assert_eq!(permit.action(), Action::CreatePost);
///
/// assert!(gate.permit(&Principal::user(UserId(2)), Action::CreatePost).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyGate {
    admin_id: UserId,
}

impl PolicyGate {
    /// Creates a gate that treats `admin_id` as the administrator.
    pub fn new(admin_id: UserId) -> Self {
        Self { admin_id }
    }

    /// The administrator identity this gate enforces.
    pub fn admin_id(&self) -> UserId {
        self.admin_id
    }

    /// Evaluates the requirements of `action` against `principal`.
    ///
    /// Pure: no logging, no state.
    pub fn authorize(&self, principal: &Principal, action: Action) -> Verdict {
        for req in action.requirements() {
            if let Err(reason) = self.validate_one(principal, *req) {
                return Verdict::Deny(reason);
            }
        }
        Verdict::Allow
    }

    /// Authorizes `action` and mints a [`Permit`] on success.
    ///
    /// # Errors
    ///
    /// Returns a [`Violation`] describing the first failed requirement.
    pub fn permit(&self, principal: &Principal, action: Action) -> Result<Permit, Violation> {
        match self.authorize(principal, action) {
            Verdict::Allow => {
                tracing::debug!(action = %action, user = ?principal.id, "gate allowed");
                Ok(Permit::new(action, principal.id))
            }
            Verdict::Deny(reason) => {
                tracing::info!(action = %action, user = ?principal.id, reason = %reason, "gate denied");
                Err(Self::violation(action, reason))
            }
        }
    }

    fn validate_one(&self, principal: &Principal, req: PolicyReq) -> Result<(), DenyReason> {
        match req {
            PolicyReq::Authenticated => {
                if !principal.authenticated {
                    return Err(DenyReason::AuthenticationRequired);
                }
            }
            PolicyReq::Administrator => {
                if !principal.is(self.admin_id) {
                    return Err(DenyReason::AdministratorOnly);
                }
            }
        }
        Ok(())
    }

    fn violation(action: Action, reason: DenyReason) -> Violation {
        let kind = match reason {
            DenyReason::AuthenticationRequired => ViolationKind::Unauthenticated { action },
            DenyReason::AdministratorOnly => ViolationKind::AdministratorOnly { action },
        };
        Violation::new(kind, reason.as_str())
    }
}

impl Default for PolicyGate {
    fn default() -> Self {
        Self::new(ADMIN_ID)
    }
}

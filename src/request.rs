use std::fmt;

use serde::Deserialize;

/// Numeric identity of a registered user (`users.id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed identity of the blog administrator.
///
/// There is no role table: the user whose id is `1` owns the post lifecycle.
pub const ADMIN_ID: UserId = UserId(1);

/// The actor making a request, authenticated or anonymous.
///
/// The session layer builds one of these per request and hands it to the
/// gate explicitly. Nothing in this crate reads a "current user" from
/// ambient state.
///
/// # Examples
///
/// ```
/// use blog_policy::{Principal, UserId};
///
/// let visitor = Principal::anonymous();
/// assert!(!visitor.authenticated);
/// assert!(visitor.id.is_none());
///
/// let alice = Principal::user(UserId(7));
/// assert!(alice.authenticated);
/// assert_eq!(alice.id, Some(UserId(7)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// Identity of the user, absent for anonymous visitors
    pub id: Option<UserId>,
    /// Whether the session layer vouched for this principal
    pub authenticated: bool,
}

impl Principal {
    /// An anonymous visitor.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            authenticated: false,
        }
    }

    /// An authenticated, registered user.
    pub fn user(id: UserId) -> Self {
        Self {
            id: Some(id),
            authenticated: true,
        }
    }

    /// Returns `true` if this principal is authenticated and carries `admin_id`.
    pub fn is(&self, admin_id: UserId) -> bool {
        self.authenticated && self.id == Some(admin_id)
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Metadata about an incoming request.
///
/// Contains the request identifier used for log correlation and the
/// principal supplied by the session layer.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// The acting principal
    pub principal: Principal,
}

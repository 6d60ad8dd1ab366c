use crate::policy::Action;
use crate::request::UserId;

/// Proof that the gate allowed a specific action for a specific user.
///
/// Store mutations take a `&Permit` and check that it was minted for the
/// matching action, so storage cannot be reached without passing the gate
/// first.
///
/// It cannot be constructed outside this crate; only
/// [`PolicyGate::permit`](crate::PolicyGate::permit) hands them out.
///
/// ```compile_fail
/// use blog_policy::{Action, Permit};
///
/// // Error: private fields
/// let permit = Permit { action: Action::DeletePost, user: None, _private: () };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    action: Action,
    user: Option<UserId>,
    // Private field prevents construction outside the crate
    _private: (),
}

impl Permit {
    /// Only the gate mints permits.
    pub(crate) fn new(action: Action, user: Option<UserId>) -> Self {
        Self {
            action,
            user,
            _private: (),
        }
    }

    /// The action this permit was granted for.
    pub fn action(&self) -> Action {
        self.action
    }

    /// The user the permit was granted to.
    ///
    /// Always `Some` for actions that require authentication.
    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Returns `true` if this permit covers `action`.
    pub fn allows(&self, action: Action) -> bool {
        self.action == action
    }
}

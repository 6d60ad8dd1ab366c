use std::fmt;

/// An action a principal may attempt against the blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read-only browsing: index, post detail, about page
    Browse,
    /// Publish a new post
    CreatePost,
    /// Change an existing post
    EditPost,
    /// Permanently remove a post
    DeletePost,
    /// Add a comment under a post
    CommentOnPost,
    /// Permanently remove a comment
    DeleteComment,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 6] = [
        Action::Browse,
        Action::CreatePost,
        Action::EditPost,
        Action::DeletePost,
        Action::CommentOnPost,
        Action::DeleteComment,
    ];

    /// Stable snake_case name used in logs and audit events.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Browse => "browse",
            Action::CreatePost => "create_post",
            Action::EditPost => "edit_post",
            Action::DeletePost => "delete_post",
            Action::CommentOnPost => "comment_on_post",
            Action::DeleteComment => "delete_comment",
        }
    }

    /// Returns `true` for the post lifecycle actions reserved to the administrator.
    pub fn is_post_administration(self) -> bool {
        matches!(
            self,
            Action::CreatePost | Action::EditPost | Action::DeletePost
        )
    }

    /// The policy requirements for this action, in evaluation order.
    ///
    /// `DeleteComment` only requires authentication: any signed-in user may
    /// remove any comment. There is no ownership check.
    pub fn requirements(self) -> &'static [PolicyReq] {
        match self {
            Action::Browse => &[],
            Action::CreatePost | Action::EditPost | Action::DeletePost => {
                &[PolicyReq::Authenticated, PolicyReq::Administrator]
            }
            Action::CommentOnPost | Action::DeleteComment => &[PolicyReq::Authenticated],
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy requirement that must be satisfied.
///
/// Requirements are evaluated by [`PolicyGate`](crate::PolicyGate) in the
/// order [`Action::requirements`] lists them; the first failure decides the
/// verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyReq {
    /// Requires an authenticated principal
    Authenticated,
    /// Requires the administrator identity
    Administrator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_has_no_requirements() {
        assert!(Action::Browse.requirements().is_empty());
    }

    #[test]
    fn authentication_is_checked_first() {
        for action in Action::ALL {
            if let Some(first) = action.requirements().first() {
                assert_eq!(*first, PolicyReq::Authenticated, "{action}");
            }
        }
    }

    #[test]
    fn only_post_administration_requires_admin() {
        for action in Action::ALL {
            let needs_admin = action.requirements().contains(&PolicyReq::Administrator);
            assert_eq!(needs_admin, action.is_post_administration(), "{action}");
        }
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Action::DeleteComment.to_string(), "delete_comment");
        assert_eq!(Action::CreatePost.as_str(), "create_post");
    }
}

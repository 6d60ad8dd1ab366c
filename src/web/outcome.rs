//! What a handler tells the routing/rendering layer to do.

use std::fmt;

use url::form_urlencoded;

use crate::model::{Comment, CommentId, Post, PostId};

/// Notice shown to a non-administrator who tries to manage posts.
pub const ADMIN_ONLY_NOTICE: &str = "Only admin can create/edit posts";

/// Notice shown to an anonymous visitor who tries to comment.
pub const LOGIN_TO_COMMENT_NOTICE: &str = "Must be logged in for this";

/// A transient error message carried with a redirect (a flash message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown to the visitor
    pub message: String,
}

impl Notice {
    /// A notice telling the visitor why a request was refused.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Redirect targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The post list
    Index,
    /// The login page, optionally returning to `next` afterwards
    Login {
        /// URL to resume after logging in
        next: Option<String>,
    },
    /// A single post with its comments
    PostDetail(PostId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Index => write!(f, "/"),
            Route::Login { next: None } => write!(f, "/login"),
            Route::Login { next: Some(next) } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("next", next)
                    .finish();
                write!(f, "/login?{}", query)
            }
            Route::PostDetail(id) => write!(f, "/post/{}", id),
        }
    }
}

/// Pages a handler can ask the rendering layer to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Every post
    Index {
        /// Posts, oldest first
        posts: Vec<Post>,
    },
    /// One post with its comments and the comment form
    PostDetail {
        /// The post
        post: Post,
        /// Its comments, oldest first
        comments: Vec<Comment>,
    },
    /// The new-post form
    PostForm {
        /// Why the last submission was refused, if it was
        notice: Option<Notice>,
    },
    /// The edit form, pre-filled from `post`
    EditPostForm {
        /// The post being edited
        post: Post,
        /// Why the last submission was refused, if it was
        notice: Option<Notice>,
    },
    /// "Really delete this post?"
    ConfirmDeletePost {
        /// Post to delete
        post_id: PostId,
    },
    /// "Really delete this comment?"
    ConfirmDeleteComment {
        /// Comment to delete
        comment_id: CommentId,
        /// Its parent post, for the cancel link
        post_id: PostId,
    },
}

/// Result of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the visitor elsewhere, optionally with a notice
    Redirect {
        /// Target
        to: Route,
        /// Flash message
        notice: Option<Notice>,
    },
    /// Draw a page
    Render(View),
}

impl Outcome {
    /// A redirect without a notice.
    pub fn redirect(to: Route) -> Self {
        Outcome::Redirect { to, notice: None }
    }

    /// A redirect carrying `notice`.
    pub fn redirect_with(to: Route, notice: Notice) -> Self {
        Outcome::Redirect {
            to,
            notice: Some(notice),
        }
    }

    /// The redirect target, if this is a redirect.
    pub fn route(&self) -> Option<&Route> {
        match self {
            Outcome::Redirect { to, .. } => Some(to),
            Outcome::Render(_) => None,
        }
    }

    /// The notice, whether carried by a redirect or shown on a form.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Outcome::Redirect { notice, .. } => notice.as_ref(),
            Outcome::Render(View::PostForm { notice }) => notice.as_ref(),
            Outcome::Render(View::EditPostForm { notice, .. }) => notice.as_ref(),
            Outcome::Render(_) => None,
        }
    }
}

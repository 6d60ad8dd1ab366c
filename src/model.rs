//! Blog entities as the storage collaborator hands them out, and the
//! verified drafts it accepts.

use std::fmt;

use chrono::NaiveDate;

use crate::request::UserId;
use crate::sanitizer::Sanitizer;
use crate::validate::{FieldValidator, ValidationError, ValidationErrorKind, Validator, SHORT_FIELD_MAX};
use crate::{Tainted, Verified};

/// Display format for post dates, e.g. `March 04, 2024`.
pub const POST_DATE_FORMAT: &str = "%B %d, %Y";

/// Identity of a post (`posts.id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub i64);

/// Identity of a comment (`comments.id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user. The password hash stays with the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary key
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
}

/// A published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Primary key
    pub id: PostId,
    /// Owning author
    pub author_id: UserId,
    /// Unique title
    pub title: String,
    /// Optional subtitle
    pub subtitle: Option<String>,
    /// Sanitized HTML body
    pub body: String,
    /// Optional header image URL
    pub img_url: Option<String>,
    /// Creation date
    pub date: NaiveDate,
}

impl Post {
    /// The creation date in display form.
    pub fn display_date(&self) -> String {
        self.date.format(POST_DATE_FORMAT).to_string()
    }
}

/// A comment under a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Primary key
    pub id: CommentId,
    /// Owning author
    pub author_id: UserId,
    /// Parent post
    pub post_id: PostId,
    /// Sanitized HTML text
    pub text: String,
}

/// The raw post form as submitted.
#[derive(Debug, Clone)]
pub struct PostForm {
    /// Post title (required)
    pub title: Tainted<String>,
    /// Subtitle (optional)
    pub subtitle: Tainted<String>,
    /// Rich-text body (required)
    pub body: Tainted<String>,
    /// Header image URL (optional)
    pub img_url: Tainted<String>,
}

impl PostForm {
    /// Validates the plain fields and sanitizes the body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the title is missing or too long, an
    /// optional field breaks its rules, or the body is empty once sanitized.
    pub fn verify(self, sanitizer: &impl Sanitizer<String>) -> Result<PostDraft, ValidationError> {
        let title = FieldValidator::required("title", SHORT_FIELD_MAX).validate(self.title)?;
        let subtitle = FieldValidator::optional("subtitle", SHORT_FIELD_MAX).validate(self.subtitle)?;
        let img_url = FieldValidator::optional("img_url", SHORT_FIELD_MAX).validate(self.img_url)?;
        let body = non_blank("body", sanitizer.sanitize(self.body))?;

        Ok(PostDraft {
            title,
            subtitle,
            body,
            img_url,
        })
    }
}

/// A post ready to be stored: every field validated or sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Validated title
    pub title: Verified<String>,
    /// Validated subtitle
    pub subtitle: Option<Verified<String>>,
    /// Sanitized body
    pub body: Verified<String>,
    /// Validated image URL
    pub img_url: Option<Verified<String>>,
}

/// A comment ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Parent post
    pub post_id: PostId,
    /// Sanitized text
    pub text: Verified<String>,
}

impl NewComment {
    /// Sanitizes `text` for `post_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if nothing but whitespace survives sanitization.
    pub fn verify(
        post_id: PostId,
        text: Tainted<String>,
        sanitizer: &impl Sanitizer<String>,
    ) -> Result<Self, ValidationError> {
        let text = non_blank("comment", sanitizer.sanitize(text))?;
        Ok(Self { post_id, text })
    }
}

fn non_blank(field: &'static str, value: Verified<String>) -> Result<Verified<String>, ValidationError> {
    if value.as_ref().trim().is_empty() {
        return Err(ValidationError::new(
            field,
            ValidationErrorKind::Empty,
            "this field is required",
        ));
    }
    Ok(value)
}

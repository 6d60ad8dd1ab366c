//! Authorization gate and content sanitizer for a blog.
//!
//! Every mutating request runs the same pipeline:
//! - **Gate**: [`PolicyGate`] decides whether the [`Principal`] may perform
//!   an [`Action`], and mints a [`Permit`] when it may
//! - **Taint tracking**: submitted fields arrive as [`Tainted<T>`] and only a
//!   [`Validator`] or [`Sanitizer`] turns them into [`Verified<T>`]
//! - **Store**: [`BlogStore`] writes demand both a `Permit` and verified values
//!
//! # Core Types
//!
//! - [`authorize`]: pure verdict for a principal and an action
//! - [`HtmlSanitizer`] / [`sanitize`]: allow-list HTML cleaning, idempotent
//! - [`Secret<T>`]: wrapper that redacts the signing key in logs/output
//! - [`web::Blog`]: the route handlers, composed from the above
//!
//! # Examples
//!
//! ```
//! use blog_policy::{authorize, sanitize, Action, DenyReason, Principal, UserId, Verdict};
//!
//! // Only the administrator manages posts
//! assert_eq!(
//!     authorize(&Principal::anonymous(), Action::CreatePost),
//!     Verdict::Deny(DenyReason::AuthenticationRequired),
//! );
//! assert_eq!(authorize(&Principal::user(UserId(1)), Action::DeletePost), Verdict::Allow);
//!
//! // Unknown markup is stripped, its text kept
//! assert_eq!(
//!     sanitize("<p>Hello <script>alert(1)</script> <b>world</b></p>"),
//!     "<p>Hello alert(1) <b>world</b></p>",
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod capability;
mod config;
mod error;
mod gate;
pub mod logging;
pub mod model;
mod policy;
mod request;
mod sanitizer;
mod secret;
mod store;
mod tainted;
mod validate;
mod verified;
pub mod web;

pub use capability::Permit;
pub use config::{Config, ConfigError};
pub use error::{Error, Violation, ViolationKind};
pub use gate::{authorize, DenyReason, PolicyGate, Verdict};
pub use logging::RequestLog;
pub use model::{Comment, CommentId, NewComment, Post, PostDraft, PostForm, PostId, User};
pub use policy::{Action, PolicyReq};
pub use request::{Principal, RequestMeta, UserId, ADMIN_ID};
pub use sanitizer::{sanitize, HtmlSanitizer, Sanitizer, ALLOWED_ATTRIBUTES, ALLOWED_TAGS};
pub use secret::Secret;
pub use store::{BlogStore, MemoryStore, StoreError, StoreErrorKind};
pub use tainted::Tainted;
pub use validate::{
    FieldValidator, OptionalField, ValidationError, ValidationErrorKind, Validator,
    SHORT_FIELD_MAX,
};
pub use verified::Verified;

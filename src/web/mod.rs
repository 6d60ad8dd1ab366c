//! Web framework integration surface.
//!
//! This module is the boundary between an HTTP framework and the blog's
//! enforcement pipeline. It handles:
//! - Mapping requests to domain types ([`RequestMeta`](crate::RequestMeta))
//! - Introducing taint at the boundary (form fields → `Tainted<String>`)
//! - Running each route through gate, validator/sanitizer and store
//! - Telling the framework what to do next ([`Outcome`])
//!
//! It contains no framework-specific code. Integrations build a
//! [`RequestAdapter`] from their request type, call the matching [`Blog`]
//! handler, and turn the returned [`Outcome`] into a redirect (with a flash
//! message) or a rendered template.
//!
//! # Example Flow
//!
//! ```
//! use blog_policy::web::{Blog, Method, Notice, Outcome, RequestAdapter, Route, ADMIN_ONLY_NOTICE};
//! use blog_policy::{BlogStore, MemoryStore, Principal, UserId};
//!
//! let blog = Blog::new(MemoryStore::new());
//!
//! // A signed-in reader who is not the administrator
//! let mut req = RequestAdapter::new("req-7", Method::Post, "/post/new");
//! req.set_principal(Principal::user(UserId(2)));
//! req.add_form_field("title", "Mine now");
//!
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! assert_eq!(
//!     blog.create_post(&req, today),
//!     Outcome::redirect_with(Route::Index, Notice::error(ADMIN_ONLY_NOTICE)),
//! );
//! assert!(blog.store().list_posts().is_empty());
//! ```

mod adapter;
mod extract;
mod handlers;
mod outcome;

pub use adapter::{Method, RequestAdapter, TaintedForm};
pub use extract::{ExtractMetadata, ExtractTaintedInputs};
pub use handlers::{Blog, DUPLICATE_TITLE_NOTICE};
pub use outcome::{
    Notice, Outcome, Route, View, ADMIN_ONLY_NOTICE, LOGIN_TO_COMMENT_NOTICE,
};
